use serde::{Deserialize, Serialize};

/// Top-level wizard stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Personal,
    Experience,
    Education,
    Skills,
    Review,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::Personal,
        Step::Experience,
        Step::Education,
        Step::Skills,
        Step::Review,
    ];

    pub fn index(&self) -> usize {
        match self {
            Step::Personal => 0,
            Step::Experience => 1,
            Step::Education => 2,
            Step::Skills => 3,
            Step::Review => 4,
        }
    }

    pub fn next(&self) -> Option<Step> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(&self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn label(&self) -> &'static str {
        match self {
            Step::Personal => "Personal Data",
            Step::Experience => "Work Experience",
            Step::Education => "Education",
            Step::Skills => "Skills",
            Step::Review => "Final Review",
        }
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(Step::label).collect()
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Step::Personal => "personal",
            Step::Experience => "experience",
            Step::Education => "education",
            Step::Skills => "skills",
            Step::Review => "review",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|step| step.to_string() == s)
            .ok_or_else(|| format!("unknown step '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        assert_eq!(Step::Personal.next(), Some(Step::Experience));
        assert_eq!(Step::Skills.next(), Some(Step::Review));
        assert_eq!(Step::Review.next(), None);
        assert_eq!(Step::Personal.prev(), None);
        assert_eq!(Step::Experience.prev(), Some(Step::Personal));
    }

    #[test]
    fn test_step_parses_from_display_name() {
        for step in Step::ALL {
            assert_eq!(step.to_string().parse::<Step>(), Ok(step));
        }
        assert!("summary".parse::<Step>().is_err());
    }
}
