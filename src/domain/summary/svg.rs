//! 800x600 SVG rendering of a [`SummaryArtifact`].

use crate::domain::summary::artifact::SummaryArtifact;
use std::fmt::Write;

const FONT: &str = "Arial, sans-serif";

pub fn render_svg(summary: &SummaryArtifact) -> String {
    let mut svg = String::with_capacity(4096);
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    svg.push_str("<svg width=\"800\" height=\"600\" xmlns=\"http://www.w3.org/2000/svg\">\n");
    svg.push_str("  <rect width=\"800\" height=\"600\" fill=\"#1a1a2e\"/>\n");

    text(&mut svg, 400, 60, 32, "#eaeaea", "middle", true, &escape_xml(&summary.title));
    text(
        &mut svg,
        400,
        110,
        24,
        "#16c784",
        "middle",
        false,
        &format!("Total Countries: {}", summary.total_countries),
    );
    text(
        &mut svg,
        400,
        160,
        26,
        "#eaeaea",
        "middle",
        true,
        "Top 5 Countries by Estimated GDP",
    );

    for (idx, country) in summary.top_5_countries_by_gdp.iter().enumerate() {
        let y = 210 + (idx as u32) * 50;
        text(&mut svg, 50, y, 18, "#ffd700", "start", false, &format!("{}.", country.rank));
        text(&mut svg, 90, y, 18, "#eaeaea", "start", false, &escape_xml(&country.name));
        let gdp = country
            .estimated_gdp
            .parse::<f64>()
            .map(format_thousands)
            .unwrap_or_else(|_| escape_xml(&country.estimated_gdp));
        text(&mut svg, 400, y, 18, "#16c784", "start", false, &format!("${}", gdp));
        let code = country.currency_code.as_deref().unwrap_or("N/A");
        text(&mut svg, 650, y, 16, "#9ca3af", "start", false, &format!("({})", escape_xml(code)));
    }

    text(
        &mut svg,
        400,
        560,
        16,
        "#9ca3af",
        "middle",
        false,
        &format!("Last Refreshed: {}", escape_xml(&summary.last_refreshed)),
    );
    svg.push_str("</svg>\n");
    svg
}

#[allow(clippy::too_many_arguments)]
fn text(out: &mut String, x: u32, y: u32, size: u32, fill: &str, anchor: &str, bold: bool, body: &str) {
    let weight = if bold { " font-weight=\"bold\"" } else { "" };
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "  <text x=\"{x}\" y=\"{y}\" font-family=\"{font}\" font-size=\"{size}\"{weight} fill=\"{fill}\" text-anchor=\"{anchor}\">{body}</text>",
        font = FONT,
    );
}

pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// `1234567.891` -> `1,234,567.89`
pub fn format_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::summary::artifact::RankedCountry;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0.0), "0.00");
        assert_eq!(format_thousands(999.999), "1,000.00");
        assert_eq!(format_thousands(1234567.891), "1,234,567.89");
        assert_eq!(format_thousands(-12345.0), "-12,345.00");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("Côte d'Ivoire & <Co>"), "Côte d&apos;Ivoire &amp; &lt;Co&gt;");
    }

    #[test]
    fn renders_rows_for_each_ranked_country() {
        let summary = SummaryArtifact {
            title: "Country Exchange Rate Summary".to_string(),
            total_countries: 250,
            top_5_countries_by_gdp: vec![
                RankedCountry {
                    rank: 1,
                    name: "Bosnia & Herzegovina".to_string(),
                    currency_code: Some("BAM".to_string()),
                    estimated_gdp: "1234567.89".to_string(),
                },
                RankedCountry {
                    rank: 2,
                    name: "Tuvalu".to_string(),
                    currency_code: None,
                    estimated_gdp: "10.00".to_string(),
                },
            ],
            last_refreshed: "2025-10-22T12:00:00.000Z".to_string(),
            generated_at: "2025-10-22T12:00:01.000Z".to_string(),
        };
        let svg = render_svg(&summary);
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("Total Countries: 250"));
        assert!(svg.contains("Bosnia &amp; Herzegovina"));
        assert!(svg.contains("$1,234,567.89"));
        assert!(svg.contains("(BAM)"));
        assert!(svg.contains("(N/A)"));
        assert!(svg.contains("Last Refreshed: 2025-10-22T12:00:00.000Z"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
