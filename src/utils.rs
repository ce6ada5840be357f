use std::{fmt, time::Duration};

use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};

/// Title-cases a name: the first letter of every word upper-case, the rest
/// lower-case. A word starts after any non-alphabetic character other than
/// an apostrophe, so "guns n' roses" and "don't" stay readable.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;

    for c in name.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = in_word && c == '\'';
        }
    }

    out
}

/// Makes an artist name safe to use as a single path component.
pub fn sanitize_dir_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match cleaned.trim() {
        "" | "." | ".." => "_".to_string(),
        s => s.to_string(),
    }
}

/// Release groups accepted by the `include_groups` album filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReleaseKind {
    #[value(name = "album")]
    Album,
    #[value(name = "single")]
    Single,
    #[value(name = "appears_on")]
    AppearsOn,
    #[value(name = "compilation")]
    Compilation,
    #[value(name = "all")]
    All,
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReleaseKind::Album => "album",
            ReleaseKind::Single => "single",
            ReleaseKind::AppearsOn => "appears_on",
            ReleaseKind::Compilation => "compilation",
            ReleaseKind::All => "all",
        };
        f.write_str(s)
    }
}

/// A deduplicated, ordered set of release groups. Displays as the
/// comma-separated value the albums endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseKinds(Vec<ReleaseKind>);

impl ReleaseKinds {
    pub fn new(kinds: &[ReleaseKind]) -> Self {
        let mut out: Vec<ReleaseKind> = Vec::new();
        for kind in kinds {
            let expanded: &[ReleaseKind] = match kind {
                ReleaseKind::All => &[
                    ReleaseKind::Album,
                    ReleaseKind::Single,
                    ReleaseKind::AppearsOn,
                    ReleaseKind::Compilation,
                ],
                other => std::slice::from_ref(other),
            };
            for k in expanded {
                if !out.contains(k) {
                    out.push(*k);
                }
            }
        }
        Self(out)
    }

    pub fn kinds(&self) -> &[ReleaseKind] {
        &self.0
    }
}

impl Default for ReleaseKinds {
    fn default() -> Self {
        Self::new(&[ReleaseKind::Album, ReleaseKind::Single])
    }
}

impl fmt::Display for ReleaseKinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
