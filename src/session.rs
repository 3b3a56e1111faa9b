//! 作業セッション
//!
//! 3種類のテーブル（読み込んだ全件と、絞り込み結果のビュー）、顧客の検証結果、
//! 選択中のテーブル種別とルール一覧を保持する。
//!
//! 状態遷移はすべて `self` を消費して新しい `Session` を返す。
//! 自然言語クエリは [`Session::begin_query`] で番号付きのチケットを発行し、
//! [`Session::finish_query`] で結果を反映する。古いチケットの結果は捨てる。

use crate::export::ExportTable;
use crate::query::{PendingQuery, QueryOutcome, QueryTicket};
use data_alchemist_common::{
    score, validate_clients, Client, Records, Rule, RuleSet, Scored, TableKind, TableRecord, Task,
    ValidationErrors, Worker,
};
use std::collections::HashMap;

/// 絞り込み結果
#[derive(Debug, Clone, PartialEq)]
pub enum View<R> {
    /// ルールスコアリングの結果（スコア降順）
    Scored(Vec<Scored<R>>),
    /// 自然言語クエリの結果（サービスの返した順）
    Queried(Vec<R>),
}

impl<R> View<R> {
    pub fn len(&self) -> usize {
        match self {
            View::Scored(rows) => rows.len(),
            View::Queried(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> Vec<&R> {
        match self {
            View::Scored(rows) => rows.iter().map(|s| &s.record).collect(),
            View::Queried(rows) => rows.iter().collect(),
        }
    }
}

/// 1種類分のテーブル
#[derive(Debug, Clone)]
pub struct Table<R> {
    all: Vec<R>,
    view: Option<View<R>>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            all: Vec::new(),
            view: None,
        }
    }
}

impl<R: TableRecord> Table<R> {
    /// 読み込んだ全件
    pub fn all(&self) -> &[R] {
        &self.all
    }

    pub fn view(&self) -> Option<&View<R>> {
        self.view.as_ref()
    }

    pub fn is_filtered(&self) -> bool {
        self.view.is_some()
    }

    /// 絞り込み結果が1件以上あるビュー
    fn visible_view(&self) -> Option<&View<R>> {
        self.view.as_ref().filter(|view| !view.is_empty())
    }

    /// 表示対象: 空でないビューがあればビュー、なければ全件
    ///
    /// 0件の絞り込み結果は全件表示に戻る。区別が必要なら [`Table::is_filtered`] を見る。
    pub fn active(&self) -> Vec<&R> {
        match self.visible_view() {
            Some(view) => view.records(),
            None => self.all.iter().collect(),
        }
    }

    /// 表示対象を書き出し用の表に変換（スコアリング結果ならスコア列付き）
    pub fn export_table(&self) -> ExportTable {
        match self.visible_view() {
            Some(View::Scored(scored)) => ExportTable::from_scored(scored),
            Some(View::Queried(rows)) => ExportTable::from_records(rows),
            None => ExportTable::from_records(&self.all),
        }
    }

    fn replace(&mut self, records: Vec<R>) {
        self.all = records;
        self.view = None;
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    clients: Table<Client>,
    workers: Table<Worker>,
    tasks: Table<Task>,
    client_errors: ValidationErrors,
    selected: TableKind,
    rules: RuleSet,
    /// 最後に発行したクエリ番号
    issued: u64,
    /// 種別ごとの反映済み下限。これ以下の番号の結果は古い
    floor: HashMap<TableKind, u64>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            clients: Table::default(),
            workers: Table::default(),
            tasks: Table::default(),
            client_errors: ValidationErrors::new(),
            selected: TableKind::Clients,
            rules: RuleSet::new(),
            issued: 0,
            floor: HashMap::new(),
        }
    }

    pub fn clients(&self) -> &Table<Client> {
        &self.clients
    }

    pub fn workers(&self) -> &Table<Worker> {
        &self.workers
    }

    pub fn tasks(&self) -> &Table<Task> {
        &self.tasks
    }

    /// 顧客テーブルの検証結果（読み込みのたびに再計算）
    pub fn client_errors(&self) -> &ValidationErrors {
        &self.client_errors
    }

    pub fn selected(&self) -> TableKind {
        self.selected
    }

    pub fn rules(&self) -> &[Rule] {
        self.rules.rules()
    }

    /// 読み込んだ全件（コピー）
    pub fn records(&self, kind: TableKind) -> Records {
        match kind {
            TableKind::Clients => Records::Clients(self.clients.all.clone()),
            TableKind::Workers => Records::Workers(self.workers.all.clone()),
            TableKind::Tasks => Records::Tasks(self.tasks.all.clone()),
        }
    }

    /// 表示対象（コピー）
    pub fn active(&self, kind: TableKind) -> Records {
        fn owned<R: Clone>(rows: Vec<&R>) -> Vec<R> {
            rows.into_iter().cloned().collect()
        }

        match kind {
            TableKind::Clients => Records::Clients(owned(self.clients.active())),
            TableKind::Workers => Records::Workers(owned(self.workers.active())),
            TableKind::Tasks => Records::Tasks(owned(self.tasks.active())),
        }
    }

    /// ビューの件数（ビューがなければ None）
    pub fn view_len(&self, kind: TableKind) -> Option<usize> {
        match kind {
            TableKind::Clients => self.clients.view().map(View::len),
            TableKind::Workers => self.workers.view().map(View::len),
            TableKind::Tasks => self.tasks.view().map(View::len),
        }
    }

    pub fn export_table(&self, kind: TableKind) -> ExportTable {
        match kind {
            TableKind::Clients => self.clients.export_table(),
            TableKind::Workers => self.workers.export_table(),
            TableKind::Tasks => self.tasks.export_table(),
        }
    }

    /// テーブルを丸ごと置き換える
    ///
    /// ビューは解除し、発行済みのクエリは古いものとして扱う。
    /// 顧客テーブルなら検証をやり直す。
    #[must_use]
    pub fn load(mut self, records: Records) -> Self {
        let kind = records.kind();
        tracing::info!(kind = %kind, rows = records.len(), "table loaded");

        match records {
            Records::Clients(rows) => {
                self.client_errors = validate_clients(&rows);
                if !self.client_errors.is_empty() {
                    tracing::warn!(rows = self.client_errors.len(), "client rows with validation errors");
                }
                self.clients.replace(rows);
            }
            Records::Workers(rows) => self.workers.replace(rows),
            Records::Tasks(rows) => self.tasks.replace(rows),
        }

        self.invalidate_queries(kind);
        self
    }

    /// スコアリング対象を切り替える。種別が変わればルールは破棄
    #[must_use]
    pub fn select(mut self, kind: TableKind) -> Self {
        if self.selected != kind {
            if !self.rules.is_empty() {
                tracing::debug!(from = %self.selected, to = %kind, "rules discarded on kind change");
            }
            self.rules.clear();
            self.selected = kind;
        }
        self
    }

    /// ルールを追加（不完全なルールは無視）
    #[must_use]
    pub fn add_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn remove_rule(mut self, index: usize) -> Self {
        if self.rules.remove(index).is_none() {
            tracing::debug!(index, "no rule at index");
        }
        self
    }

    #[must_use]
    pub fn clear_rules(mut self) -> Self {
        self.rules.clear();
        self
    }

    /// 選択中のテーブル全件をルールでスコアリングし、ビューを置き換える
    ///
    /// ルールが空ならビューを解除する。
    #[must_use]
    pub fn apply_rules(mut self) -> Self {
        let kind = self.selected;
        let rules = self.rules.rules();

        match kind {
            TableKind::Clients => self.clients.view = scored_view(&self.clients.all, rules),
            TableKind::Workers => self.workers.view = scored_view(&self.workers.all, rules),
            TableKind::Tasks => self.tasks.view = scored_view(&self.tasks.all, rules),
        }

        self.invalidate_queries(kind);
        self
    }

    /// 選択中のテーブルに対するクエリを発行
    ///
    /// 空白のみの問い合わせは何もしない（チケットも発行しない）。
    #[must_use]
    pub fn begin_query(mut self, text: &str) -> (Self, Option<PendingQuery>) {
        if text.trim().is_empty() {
            return (self, None);
        }

        self.issued += 1;
        let ticket = QueryTicket {
            kind: self.selected,
            sequence: self.issued,
        };
        tracing::debug!(kind = %ticket.kind, sequence = ticket.sequence, "query issued");

        let pending = PendingQuery {
            ticket,
            text: text.to_string(),
            records: self.records(ticket.kind),
        };
        (self, Some(pending))
    }

    /// クエリ結果を反映。反映済みより古い結果は捨てる
    #[must_use]
    pub fn finish_query(mut self, outcome: QueryOutcome) -> Self {
        let ticket = outcome.ticket;
        let floor = self.floor.get(&ticket.kind).copied().unwrap_or(0);

        if ticket.sequence <= floor || outcome.filtered.kind() != ticket.kind {
            tracing::debug!(
                kind = %ticket.kind,
                sequence = ticket.sequence,
                floor,
                "stale query result discarded"
            );
            return self;
        }

        self.floor.insert(ticket.kind, ticket.sequence);
        match outcome.filtered {
            Records::Clients(rows) => self.clients.view = Some(View::Queried(rows)),
            Records::Workers(rows) => self.workers.view = Some(View::Queried(rows)),
            Records::Tasks(rows) => self.tasks.view = Some(View::Queried(rows)),
        }
        self
    }

    fn invalidate_queries(&mut self, kind: TableKind) {
        self.floor.insert(kind, self.issued);
    }
}

fn scored_view<R: TableRecord>(records: &[R], rules: &[Rule]) -> Option<View<R>> {
    if rules.is_empty() {
        None
    } else {
        Some(View::Scored(score(records, rules)))
    }
}
