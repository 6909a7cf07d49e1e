use clap::ValueEnum;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AssetError;

// Each match stays inside one tag and needs a whole attribute name, so
// `data-src` or a later tag on the same line is never picked up.
const SCRIPT_SRC_PATTERN: &str = r#"(?i)<script\b[^>]*?\ssrc\s*=\s*["']([^"']*)["']"#;
const LINK_HREF_PATTERN: &str = r#"(?i)<link\b[^>]*?\shref\s*=\s*["']([^"']*)["']"#;
const IMAGE_SRC_PATTERN: &str = r#"(?i)<img\b[^>]*?\ssrc\s*=\s*["']([^"']*)["']"#;
const BACKGROUND_IMAGE_PATTERN: &str = r#"(?i)background-image\s*:\s*url\(["']?(.*?)["']?\)"#;

const SCRIPT_SELECTOR: &str = "script[src]";
const LINK_SELECTOR: &str = "link[href]";
const IMAGE_SELECTOR: &str = "img[src]";

/// How asset references are located in a page body.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Parse the body as a DOM tree.
    #[default]
    #[value(name = "dom")]
    #[serde(rename = "dom")]
    Structural,
    /// Scan the raw body with regular expressions; tolerates broken markup.
    #[value(name = "regex")]
    #[serde(rename = "regex")]
    Pattern,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Js,
    Css,
    Img,
}

impl AssetKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AssetKind::Js => "js",
            AssetKind::Css => "css",
            AssetKind::Img => "img",
        }
    }
}

/// Raw, possibly relative asset references found in one body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedAssets {
    pub js: Vec<String>,
    pub css: Vec<String>,
    pub img: Vec<String>,
}

impl ExtractedAssets {
    #[must_use]
    pub fn len(&self) -> usize {
        self.js
            .len()
            .saturating_add(self.css.len())
            .saturating_add(self.img.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
struct AssetPatterns {
    script_src: Regex,
    link_href: Regex,
    image_src: Regex,
    background_image: Regex,
}

#[derive(Debug)]
struct AssetSelectors {
    script: Selector,
    link: Selector,
    image: Selector,
}

#[derive(Debug)]
pub struct AssetExtractor {
    mode: ExtractMode,
    patterns: AssetPatterns,
    selectors: AssetSelectors,
}

impl AssetExtractor {
    /// Builds an extractor for the given strategy.
    ///
    /// Both the pattern set and the selectors are always compiled so a
    /// structural pass can fall back to patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the built-in patterns or selectors fails
    /// to compile.
    pub fn new(mode: ExtractMode) -> Result<Self, AssetError> {
        Ok(Self {
            mode,
            patterns: AssetPatterns {
                script_src: compile(SCRIPT_SRC_PATTERN)?,
                link_href: compile(LINK_HREF_PATTERN)?,
                image_src: compile(IMAGE_SRC_PATTERN)?,
                background_image: compile(BACKGROUND_IMAGE_PATTERN)?,
            },
            selectors: AssetSelectors {
                script: parse_selector(SCRIPT_SELECTOR)?,
                link: parse_selector(LINK_SELECTOR)?,
                image: parse_selector(IMAGE_SELECTOR)?,
            },
        })
    }

    #[must_use]
    pub const fn mode(&self) -> ExtractMode {
        self.mode
    }

    /// Extracts asset references from a response body.
    ///
    /// Never fails: a body the structural pass cannot handle is scanned with
    /// the pattern set instead.
    #[must_use]
    pub fn extract(&self, body: &[u8]) -> ExtractedAssets {
        match self.mode {
            ExtractMode::Pattern => self.extract_pattern(&String::from_utf8_lossy(body)),
            ExtractMode::Structural => match std::str::from_utf8(body) {
                Ok(text) => self.extract_structural(text),
                Err(err) => {
                    warn!(
                        "Unable to parse document as a DOM, body is not valid UTF-8 ({}); using pattern mode.",
                        err
                    );
                    self.extract_pattern(&String::from_utf8_lossy(body))
                }
            },
        }
    }

    fn extract_structural(&self, body: &str) -> ExtractedAssets {
        let document = Html::parse_document(body);
        ExtractedAssets {
            js: select_attr(&document, &self.selectors.script, "src"),
            css: select_attr(&document, &self.selectors.link, "href"),
            img: select_attr(&document, &self.selectors.image, "src"),
        }
    }

    /// Scans markup with the pattern set. Images are `<img src>` matches
    /// followed by CSS `background-image: url(...)` matches.
    #[must_use]
    pub fn extract_pattern(&self, body: &str) -> ExtractedAssets {
        let mut img = capture_all(&self.patterns.image_src, body);
        img.extend(capture_all(&self.patterns.background_image, body));
        ExtractedAssets {
            js: capture_all(&self.patterns.script_src, body),
            css: capture_all(&self.patterns.link_href, body),
            img,
        }
    }
}

fn compile(pattern: &'static str) -> Result<Regex, AssetError> {
    Regex::new(pattern).map_err(|err| AssetError::InvalidPattern {
        pattern,
        source: err,
    })
}

fn capture_all(pattern: &Regex, body: &str) -> Vec<String> {
    pattern
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|found| found.as_str().trim())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_selector(selector: &'static str) -> Result<Selector, AssetError> {
    Selector::parse(selector).map_err(|err| AssetError::InvalidSelector {
        selector,
        message: format!("{:?}", err),
    })
}

fn select_attr(document: &Html, selector: &Selector, attr: &str) -> Vec<String> {
    document
        .select(selector)
        .filter_map(|element| element.value().attr(attr))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .collect()
}
