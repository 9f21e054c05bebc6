//! Shapes the backend's answer + generated query into one renderable HTML fragment.

use serde::Deserialize;
use serde_json::Value;

use crate::markup::{escape_html, looks_like_html};

/// The two fields the chat endpoint returns.
///
/// Fields are kept as raw JSON: a missing or `null` field reads as empty, and a
/// non-string value is shown as its JSON text instead of failing the send.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    #[serde(rename = "FINAL_RESULT", default)]
    pub final_result: Option<Value>,
    #[serde(rename = "SQL_QUERY", default)]
    pub sql_query: Option<Value>,
}

impl ChatReply {
    pub fn answer(&self) -> String {
        field_text(self.final_result.as_ref())
    }

    pub fn query(&self) -> String {
        field_text(self.sql_query.as_ref())
    }

    /// Builds the combined artifact: answer block followed by the query block.
    ///
    /// Only a string answer can be HTML. Anything else is an anomaly and is
    /// shown in a red paragraph. The query block is always present.
    pub fn to_artifact(&self) -> Artifact {
        let answer = self.answer();
        let is_html =
            matches!(self.final_result, Some(Value::String(_))) && looks_like_html(&answer);
        assemble(is_html, &answer, &self.query())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub is_html: bool,
    pub html: String,
}

fn field_text(field: Option<&Value>) -> String {
    match field {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn assemble(is_html: bool, answer: &str, query: &str) -> Artifact {
    let answer_block = if is_html {
        answer.to_string()
    } else {
        format!(r#"<p style="color:red;">{}</p>"#, escape_html(answer))
    };

    Artifact {
        is_html,
        html: answer_block + &query_block(query),
    }
}

fn query_block(query: &str) -> String {
    format!(
        "<div style='margin-top:1rem; font-family: monospace; white-space: pre-wrap;'><strong>SQL Query:</strong><br/>{}</div>",
        escape_html(query)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(body: Value) -> ChatReply {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_html_answer_passes_through() {
        let answer = "<table><tr><td>EMEA</td><td>1200</td></tr></table>";
        let artifact = reply(json!({
            "FINAL_RESULT": answer,
            "SQL_QUERY": "SELECT region, SUM(amount) FROM sales"
        }))
        .to_artifact();
        assert!(artifact.is_html);
        assert!(artifact.html.starts_with(answer));
        assert!(artifact
            .html
            .ends_with("<strong>SQL Query:</strong><br/>SELECT region, SUM(amount) FROM sales</div>"));
    }

    #[test]
    fn test_plain_answer_wrapped_in_red_paragraph() {
        let artifact = reply(json!({
            "FINAL_RESULT": "No data found for EMEA",
            "SQL_QUERY": "SELECT 1"
        }))
        .to_artifact();
        assert!(!artifact.is_html);
        assert!(artifact
            .html
            .starts_with(r#"<p style="color:red;">No data found for EMEA</p><div"#));
    }

    #[test]
    fn test_query_block_always_present_and_escaped() {
        let artifact = reply(json!({
            "FINAL_RESULT": "<b>ok</b>",
            "SQL_QUERY": "SELECT * FROM t WHERE a < 5"
        }))
        .to_artifact();
        assert!(artifact.html.contains("WHERE a &lt; 5</div>"));

        let empty = reply(json!({})).to_artifact();
        assert!(!empty.is_html);
        assert_eq!(
            empty.html,
            "<p style=\"color:red;\"></p><div style='margin-top:1rem; font-family: monospace; white-space: pre-wrap;'><strong>SQL Query:</strong><br/></div>"
        );
    }

    #[test]
    fn test_reply_defaults_missing_fields() {
        let parsed: ChatReply = serde_json::from_str(r#"{"SQL_QUERY":"SELECT 1"}"#).unwrap();
        assert_eq!(parsed.answer(), "");
        assert_eq!(parsed.query(), "SELECT 1");

        let parsed: ChatReply = serde_json::from_str(r#"{"FINAL_RESULT":null}"#).unwrap();
        assert_eq!(parsed.answer(), "");
    }

    #[test]
    fn test_non_string_answer_shown_as_plain_text() {
        let artifact = reply(json!({
            "FINAL_RESULT": 42,
            "SQL_QUERY": "SELECT COUNT(*) FROM t"
        }))
        .to_artifact();
        assert!(!artifact.is_html);
        assert!(artifact.html.starts_with(r#"<p style="color:red;">42</p>"#));

        // Markup inside a structured value is still not treated as HTML.
        let artifact = reply(json!({
            "FINAL_RESULT": ["<b>EMEA</b>"],
            "SQL_QUERY": ["SELECT", 1]
        }))
        .to_artifact();
        assert!(!artifact.is_html);
        assert!(artifact
            .html
            .starts_with(r#"<p style="color:red;">["&lt;b&gt;EMEA&lt;/b&gt;"]</p>"#));
        assert!(artifact.html.contains(r#"<br/>["SELECT",1]</div>"#));

        let object = reply(json!({ "FINAL_RESULT": { "rows": 0 } }));
        assert_eq!(object.answer(), r#"{"rows":0}"#);
    }
}
