/**
 * Derive a reference page for a question from its `source` tag, e.g. the tag
 * `R05春 問12` becomes `05_haru/q12.html`.
 */
use regex::Regex;

use super::bank::Question;
use super::common::{DrillError, Result};


/// Sources containing any of these are not past-exam questions and have no page.
const EXCLUDED: [&str; 4] = ["特別", "基本", "(AD)", "免基本"];

const SOURCE_PATTERN: &str = r"([HR])(\d+)(春|秋).*問(\d+)";


pub struct SourceLinker {
    pattern: Regex,
    base_url: String,
}


impl SourceLinker {
    pub fn new(base_url: &str) -> Result<Self> {
        let pattern = Regex::new(SOURCE_PATTERN).map_err(DrillError::Pattern)?;
        Ok(SourceLinker { pattern, base_url: base_url.to_string() })
    }

    /// The page path for `source`, relative to the base URL.
    pub fn path(&self, source: &str) -> Option<String> {
        if EXCLUDED.iter().any(|keyword| source.contains(keyword)) {
            return None;
        }

        let captures = self.pattern.captures(source)?;
        let year = captures.get(2)?.as_str();
        let period = match captures.get(3)?.as_str() {
            "春" => "haru",
            "秋" => "aki",
            _ => return None,
        };
        let number = captures.get(4)?.as_str();
        Some(format!("{}_{}/q{}.html", year, period, number))
    }

    pub fn url(&self, question: &Question) -> Option<String> {
        self.path(&question.source).map(|path| format!("{}{}", self.base_url, path))
    }
}
