//! ルールによる重み付きスコアリング
//!
//! 各レコードに一致したルールの重みを加算し、スコアが正のレコードだけを
//! スコア降順（同点は元の順序を維持）で返す。
//! スコアは一時的な注釈で、呼び出しごとに元のレコードから計算し直す。

use crate::rules::Rule;
use crate::schema::TableRecord;
use serde::Serialize;

/// スコア付きレコード
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scored<R> {
    #[serde(flatten)]
    pub record: R,
    #[serde(rename = "_score")]
    pub score: f64,
}

/// 1レコードのスコアを計算
///
/// レコードに存在しないフィールドを参照するルールは 0 として扱う。
pub fn record_score<R: TableRecord>(record: &R, rules: &[Rule]) -> f64 {
    rules
        .iter()
        .filter(|rule| {
            record
                .field(&rule.field)
                .map(|value| rule.operator.matches(value, &rule.value))
                .unwrap_or(false)
        })
        .map(|rule| rule.weight)
        .sum()
}

/// ルールを適用してスコア順に並べる
pub fn score<R: TableRecord>(records: &[R], rules: &[Rule]) -> Vec<Scored<R>> {
    let mut scored: Vec<Scored<R>> = records
        .iter()
        .map(|record| Scored {
            score: record_score(record, rules),
            record: record.clone(),
        })
        .filter(|s| s.score > 0.0)
        .collect();

    // sort_by は安定ソート
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    tracing::debug!(
        kind = %R::KIND,
        rules = rules.len(),
        input = records.len(),
        matched = scored.len(),
        "scored records"
    );

    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Operator;
    use crate::types::{Client, Task, Worker};

    fn client(id: &str, priority: &str) -> Client {
        Client {
            client_id: id.into(),
            client_name: format!("Client {}", id),
            priority_level: priority.into(),
            ..Default::default()
        }
    }

    fn worker(id: &str, skills: &str, slots: &str) -> Worker {
        Worker {
            worker_id: id.into(),
            worker_name: format!("Worker {}", id),
            skills: skills.into(),
            available_slots: slots.into(),
            max_load_per_phase: "2".into(),
        }
    }

    fn ids<R: TableRecord>(scored: &[Scored<R>], id_field: &str) -> Vec<String> {
        scored
            .iter()
            .map(|s| s.record.field(id_field).unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_gt_rule_keeps_order_on_ties() {
        let records = vec![client("A", "1"), client("B", "3"), client("C", "5")];
        let rules = vec![Rule::new("PriorityLevel", Operator::Gt, "2", 3.0)];

        let result = score(&records, &rules);
        assert_eq!(ids(&result, "ClientID"), vec!["B", "C"]);
        assert!(result.iter().all(|s| s.score == 3.0));
    }

    #[test]
    fn test_weights_accumulate_and_sort_descending() {
        let records = vec![
            worker("W1", "Plumbing", "1"),
            worker("W2", "Plumbing,Painting", "4"),
            worker("W3", "Painting", "5"),
            worker("W4", "Welding", "0"),
        ];
        let rules = vec![
            Rule::new("Skills", Operator::Includes, "Plumbing", 2.0),
            Rule::new("AvailableSlots", Operator::Gt, "3", 1.0),
        ];

        let result = score(&records, &rules);
        assert_eq!(ids(&result, "WorkerID"), vec!["W2", "W1", "W3"]);
        assert_eq!(
            result.iter().map(|s| s.score).collect::<Vec<_>>(),
            vec![3.0, 2.0, 1.0]
        );
    }

    #[test]
    fn test_rule_order_does_not_change_scores() {
        let records = vec![worker("W1", "Plumbing", "4"), worker("W2", "Painting", "9")];
        let a = Rule::new("Skills", Operator::Equals, "Plumbing", 2.0);
        let b = Rule::new("AvailableSlots", Operator::Gt, "3", 0.5);

        let forward = score(&records, &[a.clone(), b.clone()]);
        let backward = score(&records, &[b, a]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_unknown_field_contributes_nothing() {
        let records = vec![client("A", "4")];
        let rules = vec![
            Rule::new("WorkerID", Operator::Equals, "A", 5.0),
            Rule::new("PriorityLevel", Operator::Equals, "4", 1.0),
        ];

        let result = score(&records, &rules);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].score, 1.0);
    }

    #[test]
    fn test_absent_optional_field_is_skipped() {
        let mut with_ids = client("A", "3");
        with_ids.requested_task_ids = Some("T1,T2".into());
        let records = vec![client("B", "3"), with_ids];
        let rules = vec![Rule::new("RequestedTaskIDs", Operator::Includes, "T2", 1.0)];

        let result = score(&records, &rules);
        assert_eq!(ids(&result, "ClientID"), vec!["A"]);
    }

    #[test]
    fn test_non_numeric_values_do_not_match() {
        let tasks = vec![
            Task {
                task_id: "T1".into(),
                duration: "two".into(),
                ..Default::default()
            },
            Task {
                task_id: "T2".into(),
                duration: "2".into(),
                ..Default::default()
            },
        ];
        let rules = vec![Rule::new("Duration", Operator::Lt, "3", 1.0)];

        let result = score(&tasks, &rules);
        assert_eq!(ids(&result, "TaskID"), vec!["T2"]);
    }

    #[test]
    fn test_no_rules_yields_empty() {
        let records = vec![client("A", "1")];
        assert!(score(&records, &[]).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let records = vec![client("A", "1"), client("B", "3"), client("C", "5")];
        let rules = vec![
            Rule::new("PriorityLevel", Operator::Gt, "2", 3.0),
            Rule::new("ClientID", Operator::Equals, "C", 1.0),
        ];

        let first = score(&records, &rules);
        let second = score(&records, &rules);
        assert_eq!(first, second);
        assert_eq!(first[0].score, 4.0);
    }

    #[test]
    fn test_scored_serializes_flat_with_score() {
        let result = score(
            &[client("A", "3")],
            &[Rule::new("PriorityLevel", Operator::Equals, "3", 2.0)],
        );
        let value = serde_json::to_value(&result[0]).unwrap();
        assert_eq!(value["ClientID"], "A");
        assert_eq!(value["_score"], 2.0);
    }
}
