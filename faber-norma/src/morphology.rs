#![forbid(unsafe_code)]

//! Latin verb-form classification for stdlib method names.
//!
//! A stdlib method such as `filtrata` is a stem (`filtr`) plus an inflection
//! (`ata`). The inflection says whether the call mutates its receiver in place
//! (`filtra`) or returns a new value (`filtrata`), and whether it is async.

use std::fmt;

/// Grammatical form of a stdlib method name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Forma {
    /// `adde`, `filtra`: mutates the receiver in place.
    Imperativus,
    /// `addita`, `filtrata`: returns a new value.
    Perfectum,
    /// `filtrabit`: async, mutates in place.
    FuturumIndicativum,
    /// `filtratura`: async, returns a new value.
    FuturumActivum,
    /// `filtrans`: lazy / streaming.
    PraesensParticipium,
}

/// Behavior implied by a form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormaFlags {
    pub mutare: bool,
    pub futura: bool,
}

impl Forma {
    pub const ALL: [Forma; 5] = [
        Forma::Imperativus,
        Forma::Perfectum,
        Forma::FuturumIndicativum,
        Forma::FuturumActivum,
        Forma::PraesensParticipium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Forma::Imperativus => "imperativus",
            Forma::Perfectum => "perfectum",
            Forma::FuturumIndicativum => "futurum_indicativum",
            Forma::FuturumActivum => "futurum_activum",
            Forma::PraesensParticipium => "praesens_participium",
        }
    }

    pub fn from_name(name: &str) -> Option<Forma> {
        Forma::ALL.into_iter().find(|f| f.as_str() == name)
    }

    pub fn flags(&self) -> FormaFlags {
        match self {
            Forma::Imperativus => FormaFlags {
                mutare: true,
                futura: false,
            },
            Forma::FuturumIndicativum => FormaFlags {
                mutare: true,
                futura: true,
            },
            Forma::FuturumActivum => FormaFlags {
                mutare: false,
                futura: true,
            },
            Forma::Perfectum | Forma::PraesensParticipium => FormaFlags::default(),
        }
    }

    pub fn receiver_ownership(&self) -> ReceiverOwnership {
        if self.flags().mutare {
            ReceiverOwnership::In
        } else {
            ReceiverOwnership::De
        }
    }
}

impl fmt::Display for Forma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a receiver is passed to a stdlib method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiverOwnership {
    /// `de`: borrowed, read-only.
    De,
    /// `in`: borrowed, mutable.
    In,
}

impl ReceiverOwnership {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiverOwnership::De => "de",
            ReceiverOwnership::In => "in",
        }
    }
}

/// Inflection suffixes. Exact match on the remainder after the stem.
const SUFFIXES: &[(&str, Forma)] = &[
    ("a", Forma::Imperativus),
    ("e", Forma::Imperativus),
    ("i", Forma::Imperativus),
    ("ata", Forma::Perfectum),
    ("ita", Forma::Perfectum),
    ("ta", Forma::Perfectum),
    ("sa", Forma::Perfectum),
    ("abit", Forma::FuturumIndicativum),
    ("ebit", Forma::FuturumIndicativum),
    ("et", Forma::FuturumIndicativum),
    ("atura", Forma::FuturumActivum),
    ("itura", Forma::FuturumActivum),
    ("tura", Forma::FuturumActivum),
    ("sura", Forma::FuturumActivum),
    ("ans", Forma::PraesensParticipium),
    ("ens", Forma::PraesensParticipium),
    ("iens", Forma::PraesensParticipium),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedMethodum {
    pub stem: String,
    pub form: Forma,
    pub flags: FormaFlags,
}

pub fn suffix_form(suffix: &str) -> Option<Forma> {
    SUFFIXES.iter().find(|(s, _)| *s == suffix).map(|(_, f)| *f)
}

/// Classifies `name` as `stem` plus a known inflection.
pub fn parse_methodum_with_stem(name: &str, stem: &str) -> Option<ParsedMethodum> {
    let rest = name.strip_prefix(stem)?;
    let form = suffix_form(rest)?;
    tracing::trace!(name, stem, form = form.as_str(), "parsed method form");
    Some(ParsedMethodum {
        stem: stem.to_string(),
        form,
        flags: form.flags(),
    })
}

/// Greedy parser over a fixed set of known stems.
#[derive(Clone, Debug, Default)]
pub struct Morphology {
    /// Longest first, ties broken alphabetically.
    stems: Vec<String>,
}

impl Morphology {
    pub fn new<I, S>(stems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut stems: Vec<String> = stems.into_iter().map(Into::into).collect();
        stems.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        stems.dedup();
        Morphology { stems }
    }

    pub fn stems(&self) -> &[String] {
        &self.stems
    }

    /// Tries stems longest-first and returns the first that yields a known
    /// suffix.
    ///
    /// This can mis-split when one stem prefixes another: with stems `select`
    /// and `selec`, `selecta` parses as `select` + `a` (imperativus) instead of
    /// `selec` + `ta` (perfectum). Prefer `parse_methodum_with_stem` when the
    /// intended stem is known.
    pub fn parse_methodum(&self, name: &str) -> Option<ParsedMethodum> {
        self.stems
            .iter()
            .filter(|stem| name.starts_with(stem.as_str()))
            .find_map(|stem| parse_methodum_with_stem(name, stem))
    }
}
