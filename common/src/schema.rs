//! フィールドアクセサ辞書
//!
//! ルール適用時にフィールド名でレコードの値を読むための辞書。
//! レコード種別ごとに1つ、初回アクセス時に構築する。
//! 未知のフィールド名は `None`（ルールは寄与しない）として扱う。

use crate::types::{Client, TableKind, Task, Worker};
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

/// フィールド値の取り出し関数
pub type Accessor<R> = fn(&R) -> Option<&str>;

/// フィールド名 → アクセサ
pub struct FieldAccessors<R: 'static> {
    names: Vec<&'static str>,
    by_name: HashMap<&'static str, Accessor<R>>,
}

impl<R: 'static> FieldAccessors<R> {
    fn new(entries: Vec<(&'static str, Accessor<R>)>) -> Self {
        let names = entries.iter().map(|(name, _)| *name).collect();
        let by_name = entries.into_iter().collect();
        Self { names, by_name }
    }

    /// スキーマ順のフィールド名
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// フィールド値を取得（未知のフィールド・未設定の値は None）
    pub fn get<'a>(&self, name: &str, record: &'a R) -> Option<&'a str> {
        self.by_name.get(name).and_then(|accessor| accessor(record))
    }
}

/// 表レコードの共通トレイト
pub trait TableRecord:
    Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: TableKind;

    fn accessors() -> &'static FieldAccessors<Self>;

    /// スキーマ順のフィールド名
    fn fields() -> &'static [&'static str] {
        Self::accessors().names()
    }

    /// 名前でフィールド値を取得
    fn field(&self, name: &str) -> Option<&str> {
        Self::accessors().get(name, self)
    }
}

fn entry<R: 'static>(name: &'static str, accessor: Accessor<R>) -> (&'static str, Accessor<R>) {
    (name, accessor)
}

lazy_static! {
    static ref CLIENT_FIELDS: FieldAccessors<Client> = FieldAccessors::new(vec![
        entry::<Client>("ClientID", |c| Some(c.client_id.as_str())),
        entry::<Client>("ClientName", |c| Some(c.client_name.as_str())),
        entry::<Client>("PriorityLevel", |c| Some(c.priority_level.as_str())),
        entry::<Client>("RequestedTaskIDs", |c| c.requested_task_ids.as_deref()),
        entry::<Client>("AttributesJSON", |c| c.attributes_json.as_deref()),
    ]);

    static ref WORKER_FIELDS: FieldAccessors<Worker> = FieldAccessors::new(vec![
        entry::<Worker>("WorkerID", |w| Some(w.worker_id.as_str())),
        entry::<Worker>("WorkerName", |w| Some(w.worker_name.as_str())),
        entry::<Worker>("Skills", |w| Some(w.skills.as_str())),
        entry::<Worker>("AvailableSlots", |w| Some(w.available_slots.as_str())),
        entry::<Worker>("MaxLoadPerPhase", |w| Some(w.max_load_per_phase.as_str())),
    ]);

    static ref TASK_FIELDS: FieldAccessors<Task> = FieldAccessors::new(vec![
        entry::<Task>("TaskID", |t| Some(t.task_id.as_str())),
        entry::<Task>("TaskName", |t| Some(t.task_name.as_str())),
        entry::<Task>("Category", |t| Some(t.category.as_str())),
        entry::<Task>("Duration", |t| Some(t.duration.as_str())),
        entry::<Task>("RequiredSkills", |t| Some(t.required_skills.as_str())),
        entry::<Task>("PreferredPhases", |t| Some(t.preferred_phases.as_str())),
        entry::<Task>("MaxConcurrent", |t| Some(t.max_concurrent.as_str())),
    ]);
}

impl TableRecord for Client {
    const KIND: TableKind = TableKind::Clients;

    fn accessors() -> &'static FieldAccessors<Self> {
        &CLIENT_FIELDS
    }
}

impl TableRecord for Worker {
    const KIND: TableKind = TableKind::Workers;

    fn accessors() -> &'static FieldAccessors<Self> {
        &WORKER_FIELDS
    }
}

impl TableRecord for Task {
    const KIND: TableKind = TableKind::Tasks;

    fn accessors() -> &'static FieldAccessors<Self> {
        &TASK_FIELDS
    }
}
