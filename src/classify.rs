//! Exercise name classification
//!
//! Exercise names are free text typed by the user ("Bench Press (Barbell)",
//! "Pull-ups", "OHP"). Each classifier is an ordered table of name matchers;
//! the first rule that matches wins. Tables are plain data so they can be
//! inspected and tested without running an aggregation.

use serde::Serialize;

/// ---------------------------------------------------------------------------
/// Tags
/// ---------------------------------------------------------------------------

/// Canonical compound-lift family
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LiftKey {
  Squat,
  Bench,
  Deadlift,
  OverheadPress,
  Row,
  Pullup,
  RomanianDeadlift,
}

impl LiftKey {
  /// Lifts emitted in the per-lift detail map, in emission order.
  /// Romanian deadlifts are tracked (and can hold a PR) but get no detail entry.
  pub const PREFERRED: [LiftKey; 6] = [
    LiftKey::Squat,
    LiftKey::Bench,
    LiftKey::Deadlift,
    LiftKey::OverheadPress,
    LiftKey::Row,
    LiftKey::Pullup,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      LiftKey::Squat => "squat",
      LiftKey::Bench => "bench",
      LiftKey::Deadlift => "deadlift",
      LiftKey::OverheadPress => "overhead_press",
      LiftKey::Row => "row",
      LiftKey::Pullup => "pullup",
      LiftKey::RomanianDeadlift => "romanian_deadlift",
    }
  }
}

impl std::fmt::Display for LiftKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Primary muscle group for weekly volume rollups
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MuscleGroup {
  Quad,
  Hamstring,
  Pectoral,
  Back,
  Deltoid,
}

impl MuscleGroup {
  pub const ALL: [MuscleGroup; 5] = [
    MuscleGroup::Quad,
    MuscleGroup::Hamstring,
    MuscleGroup::Pectoral,
    MuscleGroup::Back,
    MuscleGroup::Deltoid,
  ];
}

/// ---------------------------------------------------------------------------
/// Rule tables
/// ---------------------------------------------------------------------------

/// How a rule tests a lowercased exercise name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatcher {
  Contains(&'static str),
  /// Contains `needle` but not `excluded`
  ContainsWithout {
    needle: &'static str,
    excluded: &'static str,
  },
  /// Whole name equals the fragment
  Exact(&'static str),
}

impl NameMatcher {
  pub fn matches(&self, lowered: &str) -> bool {
    match *self {
      NameMatcher::Contains(needle) => lowered.contains(needle),
      NameMatcher::ContainsWithout { needle, excluded } => {
        lowered.contains(needle) && !lowered.contains(excluded)
      }
      NameMatcher::Exact(name) => lowered == name,
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule<T: 'static> {
  pub matcher: NameMatcher,
  pub result: T,
}

/// Ordered rules, first match wins
#[derive(Debug, Clone, Copy)]
pub struct RuleTable<T: 'static> {
  rules: &'static [Rule<T>],
}

impl<T: Copy> RuleTable<T> {
  pub const fn new(rules: &'static [Rule<T>]) -> Self {
    Self { rules }
  }

  pub fn rules(&self) -> &'static [Rule<T>] {
    self.rules
  }

  /// Case-insensitive classification of an exercise name
  pub fn classify(&self, name: &str) -> Option<T> {
    let lowered = name.to_lowercase();
    self
      .rules
      .iter()
      .find(|rule| rule.matcher.matches(&lowered))
      .map(|rule| rule.result)
  }
}

pub static LIFT_RULES: RuleTable<LiftKey> = RuleTable::new(&[
  Rule { matcher: NameMatcher::Contains("romanian"), result: LiftKey::RomanianDeadlift },
  Rule { matcher: NameMatcher::Contains("bench"), result: LiftKey::Bench },
  Rule { matcher: NameMatcher::Contains("squat"), result: LiftKey::Squat },
  Rule {
    matcher: NameMatcher::ContainsWithout { needle: "deadlift", excluded: "romanian" },
    result: LiftKey::Deadlift,
  },
  Rule { matcher: NameMatcher::Contains("overhead press"), result: LiftKey::OverheadPress },
  Rule { matcher: NameMatcher::Exact("ohp"), result: LiftKey::OverheadPress },
  Rule { matcher: NameMatcher::Contains("row"), result: LiftKey::Row },
  Rule { matcher: NameMatcher::Contains("pull-up"), result: LiftKey::Pullup },
  Rule { matcher: NameMatcher::Contains("pullup"), result: LiftKey::Pullup },
]);

pub static MUSCLE_GROUP_RULES: RuleTable<MuscleGroup> = RuleTable::new(&[
  Rule { matcher: NameMatcher::Contains("squat"), result: MuscleGroup::Quad },
  Rule { matcher: NameMatcher::Contains("romanian"), result: MuscleGroup::Hamstring },
  Rule { matcher: NameMatcher::Contains("deadlift"), result: MuscleGroup::Back },
  Rule { matcher: NameMatcher::Contains("bench"), result: MuscleGroup::Pectoral },
  Rule { matcher: NameMatcher::Contains("overhead press"), result: MuscleGroup::Deltoid },
  Rule { matcher: NameMatcher::Contains("row"), result: MuscleGroup::Back },
  Rule { matcher: NameMatcher::Contains("pull-up"), result: MuscleGroup::Back },
  Rule { matcher: NameMatcher::Contains("pullup"), result: MuscleGroup::Back },
]);

pub fn classify_lift(name: &str) -> Option<LiftKey> {
  LIFT_RULES.classify(name)
}

pub fn classify_muscle_group(name: &str) -> Option<MuscleGroup> {
  MUSCLE_GROUP_RULES.classify(name)
}
