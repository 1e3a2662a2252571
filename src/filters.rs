//! Filter state for a search session and the generic chip used to show it.

use chrono::{Duration, NaiveDate};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Topic conventions that mark a repository as suitable for newcomers.
    pub const BEGINNER_TOPICS: [&'static str; 4] = [
        "beginner",
        "beginner-friendly",
        "good-first-issue",
        "first-timers-only",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Timeframe {
    #[value(name = "week")]
    LastWeek,
    #[value(name = "month")]
    LastMonth,
    #[value(name = "3-months")]
    Last3Months,
    #[value(name = "6-months")]
    Last6Months,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::LastWeek,
        Timeframe::LastMonth,
        Timeframe::Last3Months,
        Timeframe::Last6Months,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::LastWeek => "Last week",
            Timeframe::LastMonth => "Last month",
            Timeframe::Last3Months => "Last 3 months",
            Timeframe::Last6Months => "Last 6 months",
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            Timeframe::LastWeek => 7,
            Timeframe::LastMonth => 30,
            Timeframe::Last3Months => 90,
            Timeframe::Last6Months => 180,
        }
    }

    /// Earliest push date still inside the window.
    pub fn since(&self, today: NaiveDate) -> NaiveDate {
        today - Duration::days(self.days())
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Language suggestions offered next to the free-text language filter.
pub const SUGGESTED_LANGUAGES: [&str; 6] =
    ["C#", "C++", "Java", "Javascript", "Python", "Typescript"];

/// Session-wide filter selection. Cleared only by an explicit "clear all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub difficulty: Option<Difficulty>,
    pub language: Option<String>,
    pub timeframe: Option<Timeframe>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.difficulty.is_none() && self.language.is_none() && self.timeframe.is_none()
    }

    pub fn clear(&mut self) {
        *self = FilterSelection::default();
    }

    /// Chips for every active filter, in display order.
    pub fn chips(&self) -> Vec<String> {
        let mut chips = Vec::new();
        if let Some(d) = self.difficulty {
            chips.push(difficulty_chip(Some(d)).render());
        }
        if let Some(lang) = &self.language {
            chips.push(language_chip(Some(lang.clone())).render());
        }
        if let Some(t) = self.timeframe {
            chips.push(timeframe_chip(Some(t)).render());
        }
        chips
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Difficulty,
    Language,
    Timeframe,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FilterKind::Difficulty => "difficulty",
            FilterKind::Language => "language",
            FilterKind::Timeframe => "timeframe",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipStyle {
    pub color: &'static str,
    pub bold: bool,
}

pub trait ChipOption: Clone + PartialEq {
    fn label(&self) -> String;
}

impl ChipOption for Difficulty {
    fn label(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl ChipOption for Timeframe {
    fn label(&self) -> String {
        Timeframe::label(self).to_string()
    }
}

impl ChipOption for String {
    fn label(&self) -> String {
        self.clone()
    }
}

/// One filter dropdown: a closed option list, the current selection and a
/// style lookup used for every option.
#[derive(Clone)]
pub struct FilterChip<T: ChipOption> {
    pub kind: FilterKind,
    pub options: Vec<T>,
    pub selected: Option<T>,
    style: fn(&T) -> ChipStyle,
}

impl<T: ChipOption> FilterChip<T> {
    pub fn new(kind: FilterKind, options: Vec<T>, style: fn(&T) -> ChipStyle) -> Self {
        Self {
            kind,
            options,
            selected: None,
            style,
        }
    }

    pub fn with_selected(mut self, selected: Option<T>) -> Self {
        self.selected = selected;
        self
    }

    pub fn style_of(&self, option: &T) -> ChipStyle {
        (self.style)(option)
    }

    /// Selects `option`, or clears the selection when it is already selected.
    pub fn toggle(&mut self, option: T) {
        if self.selected.as_ref() == Some(&option) {
            self.selected = None;
        } else {
            self.selected = Some(option);
        }
    }

    pub fn render(&self) -> String {
        match &self.selected {
            Some(option) => {
                let style = self.style_of(option);
                format!("[{}: {} ({})]", self.kind, option.label(), style.color)
            }
            None => format!("[{}: any]", self.kind),
        }
    }
}

fn difficulty_style(level: &Difficulty) -> ChipStyle {
    let color = match level {
        Difficulty::Beginner => "green",
        Difficulty::Intermediate => "blue",
        Difficulty::Advanced => "purple",
    };
    ChipStyle { color, bold: true }
}

fn language_style(_: &String) -> ChipStyle {
    ChipStyle {
        color: "amber",
        bold: false,
    }
}

fn timeframe_style(_: &Timeframe) -> ChipStyle {
    ChipStyle {
        color: "slate",
        bold: false,
    }
}

pub fn difficulty_chip(selected: Option<Difficulty>) -> FilterChip<Difficulty> {
    FilterChip::new(FilterKind::Difficulty, Difficulty::ALL.to_vec(), difficulty_style)
        .with_selected(selected)
}

pub fn language_chip(selected: Option<String>) -> FilterChip<String> {
    let options = SUGGESTED_LANGUAGES.iter().map(|s| s.to_string()).collect();
    FilterChip::new(FilterKind::Language, options, language_style).with_selected(selected)
}

pub fn timeframe_chip(selected: Option<Timeframe>) -> FilterChip<Timeframe> {
    FilterChip::new(FilterKind::Timeframe, Timeframe::ALL.to_vec(), timeframe_style)
        .with_selected(selected)
}
