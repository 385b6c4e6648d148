//! Position analysis values shared by the store and the providers.

use serde::{Deserialize, Serialize};

/// Result of analysing one position.
///
/// The labels are free text produced by whatever provider ran; nothing here
/// interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub evaluation: String,
    pub best_move: String,
    #[serde(default)]
    pub top_moves: Vec<CandidateLine>,
}

/// One candidate move with its evaluation and principal variation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLine {
    #[serde(rename = "move")]
    pub mv: String,
    pub eval: String,
    /// Principal variation, moves separated by spaces.
    pub pv: String,
}

impl CandidateLine {
    pub fn new(mv: impl Into<String>, eval: impl Into<String>, pv: impl Into<String>) -> Self {
        Self {
            mv: mv.into(),
            eval: eval.into(),
            pv: pv.into(),
        }
    }
}

impl Analysis {
    /// True when the fields every view renders are present.
    pub fn is_complete(&self) -> bool {
        !self.evaluation.trim().is_empty()
            && !self.best_move.trim().is_empty()
            && self
                .top_moves
                .iter()
                .all(|line| !line.mv.trim().is_empty() && !line.eval.trim().is_empty())
    }
}

impl std::fmt::Display for Analysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Evaluation: {}", self.evaluation)?;
        write!(f, "Best move:  {}", self.best_move)?;
        for (idx, line) in self.top_moves.iter().enumerate() {
            write!(f, "\n  {}. {:<8} {:>6}  {}", idx + 1, line.mv, line.eval, line.pv)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Analysis {
        Analysis {
            evaluation: "+0.5".to_string(),
            best_move: "e2-e4".to_string(),
            top_moves: vec![CandidateLine::new("e2-e4", "+0.5", "e2-e4 e7-e5 Nf3 Nc6")],
        }
    }

    #[test]
    fn json_shape_uses_camel_case_and_move_key() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["bestMove"], "e2-e4");
        assert_eq!(json["topMoves"][0]["move"], "e2-e4");
        assert_eq!(json["topMoves"][0]["pv"], "e2-e4 e7-e5 Nf3 Nc6");
    }

    #[test]
    fn missing_top_moves_defaults_to_empty() {
        let parsed: Analysis =
            serde_json::from_str(r#"{"evaluation":"-1.2","bestMove":"Nf3"}"#).unwrap();
        assert!(parsed.top_moves.is_empty());
        assert!(parsed.is_complete());
    }

    #[test]
    fn blank_labels_are_incomplete() {
        let mut analysis = sample();
        analysis.best_move = "  ".to_string();
        assert!(!analysis.is_complete());
    }

    #[test]
    fn display_lists_lines_in_order() {
        let text = sample().to_string();
        assert!(text.starts_with("Evaluation: +0.5"));
        assert!(text.contains("1. e2-e4"));
    }
}
