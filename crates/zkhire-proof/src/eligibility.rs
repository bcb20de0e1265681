use serde::{Deserialize, Serialize};
use std::fmt;

use zkhire_core::EligibilityInput;

/// One failed requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A skill is below its threshold. Missing skills count as level 0.
    Skill {
        name: String,
        actual: u8,
        required: u8,
    },
    /// The expected salary falls outside the inclusive range.
    Salary { expected: u64, min: u64, max: u64 },
    /// The region is not an allowed region.
    Region,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skill {
                name,
                actual,
                required,
            } => write!(f, "{} proficiency too low: {} < {}", name, actual, required),
            Self::Salary { expected, min, max } => write!(
                f,
                "expected salary {} outside range [{}, {}]",
                expected, min, max
            ),
            Self::Region => write!(f, "region not in allowed set"),
        }
    }
}

/// Outcome of a local eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub eligible: bool,
    /// Human-readable reason per violation, in check order.
    pub reasons: Vec<String>,
    pub violations: Vec<Violation>,
    /// Number of skill thresholds evaluated.
    pub skills_checked: usize,
}

impl EligibilityReport {
    fn from_violations(violations: Vec<Violation>, skills_checked: usize) -> Self {
        Self {
            eligible: violations.is_empty(),
            reasons: violations.iter().map(|v| v.to_string()).collect(),
            violations,
            skills_checked,
        }
    }

    /// Number of skill thresholds the applicant missed.
    pub fn failed_skills(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| matches!(v, Violation::Skill { .. }))
            .count()
    }

    pub fn salary_failed(&self) -> bool {
        self.violations
            .iter()
            .any(|v| matches!(v, Violation::Salary { .. }))
    }

    pub fn region_failed(&self) -> bool {
        self.violations.contains(&Violation::Region)
    }
}

/// Compares private values against public requirements.
///
/// Every violated constraint is reported, not just the first. Ineligibility
/// is a normal result, never an error.
pub struct EligibilityChecker;

impl EligibilityChecker {
    pub fn check(input: &EligibilityInput) -> EligibilityReport {
        let private = &input.private;
        let public = &input.public;
        let mut violations = Vec::new();

        for (skill, &required) in &public.skill_thresholds {
            let actual = private.skills.get(skill).copied().unwrap_or(0);
            if actual < required {
                violations.push(Violation::Skill {
                    name: skill.clone(),
                    actual,
                    required,
                });
            }
        }

        let salary = private.expected_salary;
        if salary < public.salary_min || salary > public.salary_max {
            violations.push(Violation::Salary {
                expected: salary,
                min: public.salary_min,
                max: public.salary_max,
            });
        }

        if public.restricts_region() && !public.allowed_regions.contains(&private.region) {
            violations.push(Violation::Region);
        }

        EligibilityReport::from_violations(violations, public.skill_thresholds.len())
    }
}
