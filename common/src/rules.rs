//! 手動ルール定義
//!
//! (フィールド, 演算子, 値, 重み) の組を順序付きリストで保持する。
//! フィールド名が対象テーブルに存在するかはここでは検査しない
//! （存在しないフィールドはどのレコードにも一致しないだけ）。

use serde::{Deserialize, Serialize};

/// 比較演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// 文字列の完全一致
    Equals,
    /// 部分文字列
    Includes,
    /// 数値として より大きい
    Gt,
    /// 数値として より小さい
    Lt,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::Includes => "includes",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
        }
    }

    /// 値の比較
    ///
    /// gt/lt は両辺を数値として解釈し、解釈できなければ不一致。
    pub fn matches(&self, field_value: &str, rule_value: &str) -> bool {
        match self {
            Operator::Equals => field_value == rule_value,
            Operator::Includes => field_value.contains(rule_value),
            Operator::Gt => compare_numbers(field_value, rule_value, |a, b| a > b),
            Operator::Lt => compare_numbers(field_value, rule_value, |a, b| a < b),
        }
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn compare_numbers(left: &str, right: &str, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (parse_number(left), parse_number(right)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equals" | "eq" | "=" | "==" => Ok(Operator::Equals),
            "includes" | "contains" => Ok(Operator::Includes),
            "gt" | "greater" | ">" => Ok(Operator::Gt),
            "lt" | "less" | "<" => Ok(Operator::Lt),
            _ => Err(format!(
                "Unknown operator: {}. Use equals, includes, gt, or lt",
                s
            )),
        }
    }
}

/// ルール1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub field: String,
    pub operator: Operator,
    pub value: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Rule {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>, weight: f64) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            weight,
        }
    }

    /// 追加可能なルールか（フィールド・値が空でなく、重みが正の有限値）
    pub fn is_complete(&self) -> bool {
        !self.field.trim().is_empty()
            && !self.value.is_empty()
            && self.weight.is_finite()
            && self.weight > 0.0
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} \"{}\" (Weight: {})",
            self.field, self.operator, self.value, self.weight
        )
    }
}

/// `Field:op:value[:weight]` 形式
///
/// 値にコロンを含む場合、末尾の要素が数値なら重みとして扱う。
impl std::str::FromStr for Rule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let field = parts.next().unwrap_or_default().trim();
        let operator = parts
            .next()
            .ok_or_else(|| format!("Invalid rule: {}. Use Field:op:value[:weight]", s))?;
        let rest = parts
            .next()
            .ok_or_else(|| format!("Invalid rule: {}. Use Field:op:value[:weight]", s))?;

        let (value, weight) = match rest.rsplit_once(':') {
            Some((value, weight)) => match weight.trim().parse::<f64>() {
                Ok(w) => (value, w),
                Err(_) => (rest, default_weight()),
            },
            None => (rest, default_weight()),
        };

        Ok(Rule::new(field, operator.parse()?, value, weight))
    }
}

/// 順序付きルール一覧
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// ルールを追加。不完全なルールは追加せず false を返す
    pub fn push(&mut self, rule: Rule) -> bool {
        if !rule.is_complete() {
            tracing::debug!(rule = %rule, "incomplete rule rejected");
            return false;
        }
        self.rules.push(rule);
        true
    }

    /// 位置指定で削除（範囲外は何もしない）
    pub fn remove(&mut self, index: usize) -> Option<Rule> {
        if index < self.rules.len() {
            Some(self.rules.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_from_str_aliases() {
        assert_eq!("equals".parse::<Operator>().unwrap(), Operator::Equals);
        assert_eq!("contains".parse::<Operator>().unwrap(), Operator::Includes);
        assert_eq!("Includes".parse::<Operator>().unwrap(), Operator::Includes);
        assert_eq!("greater".parse::<Operator>().unwrap(), Operator::Gt);
        assert_eq!("<".parse::<Operator>().unwrap(), Operator::Lt);
        assert!("between".parse::<Operator>().is_err());
    }

    #[test]
    fn test_equals_is_exact() {
        assert!(Operator::Equals.matches("Plumbing", "Plumbing"));
        assert!(!Operator::Equals.matches("Plumbing", "plumbing"));
        assert!(!Operator::Equals.matches("Plumbing ", "Plumbing"));
    }

    #[test]
    fn test_includes_substring() {
        assert!(Operator::Includes.matches("Plumbing,Painting", "Paint"));
        assert!(!Operator::Includes.matches("Plumbing", "Welding"));
    }

    #[test]
    fn test_numeric_comparisons() {
        assert!(Operator::Gt.matches("3", "2"));
        assert!(!Operator::Gt.matches("2", "2"));
        assert!(Operator::Lt.matches("1.5", "2"));
        assert!(Operator::Gt.matches(" 10 ", "9.99"));
    }

    #[test]
    fn test_numeric_parse_failure_is_no_match() {
        assert!(!Operator::Gt.matches("abc", "2"));
        assert!(!Operator::Lt.matches("1", "two"));
        assert!(!Operator::Gt.matches("", "0"));
        assert!(!Operator::Gt.matches("inf", "2"));
        assert!(!Operator::Lt.matches("NaN", "2"));
    }

    #[test]
    fn test_rule_set_rejects_incomplete() {
        let mut rules = RuleSet::new();

        assert!(!rules.push(Rule::new("", Operator::Equals, "x", 1.0)));
        assert!(!rules.push(Rule::new("Skills", Operator::Equals, "", 1.0)));
        assert!(!rules.push(Rule::new("Skills", Operator::Equals, "x", 0.0)));
        assert!(!rules.push(Rule::new("Skills", Operator::Equals, "x", -2.0)));
        assert!(!rules.push(Rule::new("Skills", Operator::Equals, "x", f64::NAN)));
        assert!(rules.is_empty());

        assert!(rules.push(Rule::new("Skills", Operator::Includes, "Plumbing", 2.0)));
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_rule_set_remove_by_position() {
        let mut rules = RuleSet::new();
        rules.push(Rule::new("A", Operator::Equals, "1", 1.0));
        rules.push(Rule::new("B", Operator::Equals, "2", 1.0));
        rules.push(Rule::new("C", Operator::Equals, "3", 1.0));

        let removed = rules.remove(1).unwrap();
        assert_eq!(removed.field, "B");
        assert_eq!(
            rules.rules().iter().map(|r| r.field.as_str()).collect::<Vec<_>>(),
            vec!["A", "C"]
        );
        assert!(rules.remove(5).is_none());
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_rule_display() {
        let rule = Rule::new("Skills", Operator::Includes, "Plumbing", 2.0);
        assert_eq!(rule.to_string(), "Skills includes \"Plumbing\" (Weight: 2)");
    }

    #[test]
    fn test_rule_from_str() {
        let rule: Rule = "PriorityLevel:gt:2:3".parse().unwrap();
        assert_eq!(rule, Rule::new("PriorityLevel", Operator::Gt, "2", 3.0));

        let rule: Rule = "Skills:contains:Plumbing".parse().unwrap();
        assert_eq!(rule, Rule::new("Skills", Operator::Includes, "Plumbing", 1.0));

        let rule: Rule = "TaskName:equals:Shift A:B".parse().unwrap();
        assert_eq!(rule.value, "Shift A:B");
        assert_eq!(rule.weight, 1.0);

        assert!("Skills".parse::<Rule>().is_err());
        assert!("Skills:near:x".parse::<Rule>().is_err());
    }

    #[test]
    fn test_rule_deserialize_default_weight() {
        let rule: Rule =
            serde_json::from_str(r#"{"field":"Duration","operator":"lt","value":"3"}"#).unwrap();
        assert_eq!(rule.weight, 1.0);
        assert_eq!(rule.operator, Operator::Lt);
    }
}
