use serde::Serialize;

use crate::annotation::annotator::OrderedKeyword;
use crate::markup::escape_html;

/// One numbered legend line describing a highlighted placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub sequence: usize,
    pub color: &'static str,
    pub description: String,
}

/// Builds legend entries for keywords that carry a description.
///
/// Keywords without a description keep their number in the text but get no legend line.
pub fn build_legend(keywords: &[OrderedKeyword]) -> Vec<LegendEntry> {
    keywords
        .iter()
        .filter_map(|k| {
            let description = k.description.as_deref().filter(|d| !d.is_empty())?;
            Some(LegendEntry {
                sequence: k.sequence,
                color: k.color,
                description: description.to_string(),
            })
        })
        .collect()
}

/// Renders the legend as a tile list. Descriptions are escaped.
pub fn render_legend_html(legend: &[LegendEntry]) -> String {
    if legend.is_empty() {
        return String::new();
    }

    let tiles: String = legend
        .iter()
        .map(|entry| {
            format!(
                concat!(
                    r#"<div style="display:flex;align-items:center;gap:10px;padding:10px 12px;margin-bottom:10px;border-radius:10px;background:#ffffff;max-width:100%;box-shadow:0 1px 4px rgba(0,0,0,0.05);">"#,
                    r#"<div style="display:inline-flex;align-items:center;justify-content:center;min-width:28px;height:28px;border-radius:6px;background:{color};color:#fff;font-weight:600;font-size:0.9rem;padding:0 8px;">{seq}</div>"#,
                    r#"<div style="flex:1;font-size:0.92rem;font-weight:400;color:#32363a;white-space:normal;">{desc}</div>"#,
                    "</div>"
                ),
                color = entry.color,
                seq = entry.sequence,
                desc = escape_html(&entry.description),
            )
        })
        .collect();

    format!(
        r#"<div style="background-color:#ffffff;border-radius:12px;padding:12px;max-width:100%;box-sizing:border-box;">{tiles}</div>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::palette::ColorCycle;

    fn keyword(sequence: usize, description: Option<&str>) -> OrderedKeyword {
        OrderedKeyword {
            value: format!("kw{sequence}"),
            description: description.map(str::to_string),
            position: sequence * 10,
            sequence,
            color: ColorCycle::color_at(sequence - 1),
        }
    }

    #[test]
    fn test_legend_skips_missing_and_empty_descriptions() {
        let keywords = vec![
            keyword(1, Some("First")),
            keyword(2, None),
            keyword(3, Some("")),
            keyword(4, Some("Fourth")),
        ];
        let legend = build_legend(&keywords);
        assert_eq!(legend.len(), 2);
        assert_eq!(legend[0].sequence, 1);
        assert_eq!(legend[1].sequence, 4);
        assert_eq!(legend[1].color, ColorCycle::color_at(3));
    }

    #[test]
    fn test_render_legend_escapes_description() {
        let legend = build_legend(&[keyword(1, Some("Amount <USD> & tax"))]);
        let html = render_legend_html(&legend);
        assert!(html.contains("Amount &lt;USD&gt; &amp; tax"));
        assert!(html.contains(">1</div>"));
        assert!(html.contains(ColorCycle::color_at(0)));
    }

    #[test]
    fn test_render_empty_legend_is_empty() {
        assert_eq!(render_legend_html(&[]), "");
    }
}
