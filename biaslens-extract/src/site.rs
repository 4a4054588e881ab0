use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// News outlets with dedicated handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    Cnn,
    FoxNews,
    Bbc,
    NyTimes,
    ApNews,
    Guardian,
    TheHill,
    Npr,
    Unknown,
}

impl Site {
    /// Known sites in detection order. The first match wins.
    pub const KNOWN: [Site; 8] = [
        Site::Cnn,
        Site::FoxNews,
        Site::Bbc,
        Site::NyTimes,
        Site::ApNews,
        Site::Guardian,
        Site::TheHill,
        Site::Npr,
    ];

    pub fn domain_fragments(self) -> &'static [&'static str] {
        match self {
            Site::Cnn => &["cnn.com"],
            Site::FoxNews => &["foxnews.com"],
            Site::Bbc => &["bbc.com", "bbc.co.uk"],
            Site::NyTimes => &["nytimes.com"],
            Site::ApNews => &["apnews.com"],
            Site::Guardian => &["theguardian.com"],
            Site::TheHill => &["thehill.com"],
            Site::Npr => &["npr.org"],
            Site::Unknown => &[],
        }
    }

    /// Classify a page address.
    ///
    /// Matching is a case-insensitive substring test against the host when
    /// the address parses as a URL, and against the whole address otherwise.
    /// Never fails; unrecognised addresses map to [`Site::Unknown`].
    ///
    /// ```
    /// use biaslens_extract::Site;
    ///
    /// assert_eq!(Site::detect("https://www.cnn.com/2024/politics/x"), Site::Cnn);
    /// assert_eq!(Site::detect("https://www.BBC.co.uk/news/1"), Site::Bbc);
    /// assert_eq!(Site::detect("https://example.org/?ref=cnn.com"), Site::Unknown);
    /// assert_eq!(Site::detect(""), Site::Unknown);
    /// ```
    pub fn detect(address: &str) -> Site {
        let haystack = match Url::parse(address.trim()) {
            Ok(url) => match url.host_str() {
                Some(host) => host.to_ascii_lowercase(),
                None => return Site::Unknown,
            },
            Err(_) => address.to_ascii_lowercase(),
        };
        if haystack.is_empty() {
            return Site::Unknown;
        }
        Site::KNOWN
            .into_iter()
            .find(|site| {
                site.domain_fragments()
                    .iter()
                    .any(|fragment| haystack.contains(fragment))
            })
            .unwrap_or(Site::Unknown)
    }

    pub fn is_known(self) -> bool {
        self != Site::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Site::Cnn => "cnn",
            Site::FoxNews => "fox_news",
            Site::Bbc => "bbc",
            Site::NyTimes => "ny_times",
            Site::ApNews => "ap_news",
            Site::Guardian => "guardian",
            Site::TheHill => "the_hill",
            Site::Npr => "npr",
            Site::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
