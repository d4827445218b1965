//! Tags describing where a side sits in a conflict and whose text it holds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vertical placement of a side within its conflict block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Opened by the `<<<<<<<` banner
    Top,

    /// Opened by the `|||||||` banner (diff3 only)
    Middle,

    /// Closed by the `>>>>>>>` banner
    Bottom,
}

impl Position {
    pub const fn name(self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::Middle => "middle",
            Position::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which participant of the merge a side came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// The branch being merged into (or, during a rebase, the upstream)
    Ours,

    /// The branch being merged in (or, during a rebase, the replayed commit)
    Theirs,

    /// The common ancestor from diff3 output
    Base,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Ours, Source::Theirs, Source::Base];

    pub const fn name(self) -> &'static str {
        match self {
            Source::Ours => "ours",
            Source::Theirs => "theirs",
            Source::Base => "base",
        }
    }

    /// Label shown to users
    pub const fn label(self) -> &'static str {
        match self {
            Source::Ours => "Ours",
            Source::Theirs => "Theirs",
            Source::Base => "Base",
        }
    }

    /// Style class used when decorating this side's text
    pub const fn style_class(self) -> &'static str {
        match self {
            Source::Ours => "conflict-ours",
            Source::Theirs => "conflict-theirs",
            Source::Base => "conflict-base",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_serialize_by_name() {
        for source in Source::ALL {
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json, format!("\"{}\"", source.name()));
        }
        assert_eq!(
            serde_json::from_str::<Position>("\"middle\"").unwrap(),
            Position::Middle
        );
    }

    #[test]
    fn labels_and_styles_follow_the_source() {
        assert_eq!(Source::Theirs.label(), "Theirs");
        assert_eq!(Source::Base.style_class(), "conflict-base");
        assert_eq!(Position::Bottom.to_string(), "bottom");
    }
}
