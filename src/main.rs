use clap::Parser;
use data_alchemist::{cli, config, error, export, ingest, query, session};
use cli::{Cli, Commands, ExportFormat, RuleCheck};
use config::Config;
use data_alchemist_common::{summarize, TableKind};
use error::{AlchemistError, Result};
use query::{HttpInterpreter, QueryAdapter};
use session::Session;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Validate { input, json } => {
            let records = ingest::load_records(&input, TableKind::Clients)?;
            let session = Session::new().load(records);
            let errors = session.client_errors();

            if json {
                println!("{}", serde_json::to_string_pretty(errors)?);
                return Ok(());
            }

            println!("🔍 data-alchemist - 顧客データ検証\n");
            println!("✔ {}行を読み込み", session.clients().all().len());

            if errors.is_empty() {
                println!("\n✅ エラーはありません");
            } else {
                println!("\n⚠ {}行にエラーがあります:", errors.len());
                for line in summarize(errors) {
                    println!("  {}", line);
                }
            }
        }

        Commands::Score { input, kind, rules, output } => {
            println!("⚖ data-alchemist - ルールスコアリング\n");

            let records = ingest::load_records(&input, kind)?;
            println!("✔ {} {}行を読み込み", kind.label(), records.len());

            let mut session = Session::new().load(records).select(kind);
            for rule in rules {
                match cli::check_rule(kind, &rule) {
                    RuleCheck::Rejected(message) => {
                        println!("⚠ {}", message);
                    }
                    RuleCheck::Accepted { warnings } => {
                        for warning in warnings {
                            println!("⚠ {}", warning);
                        }
                        println!("- {}", rule);
                        session = session.add_rule(rule);
                    }
                }
            }

            if session.rules().is_empty() {
                println!("⚠ 有効なルールがないため全件を表示します");
            }

            let session = session.apply_rules();
            print_active(&session, kind);

            if let Some(output) = output {
                write_output(&session, kind, &output, &config)?;
            }
        }

        Commands::Query { input, text, kind, endpoint, output } => {
            println!("💬 data-alchemist - 自然言語クエリ\n");

            let records = ingest::load_records(&input, kind)?;
            println!("✔ {} {}行を読み込み", kind.label(), records.len());

            let interpreter = match endpoint {
                Some(url) => HttpInterpreter::new(
                    url,
                    config.api_key(),
                    Duration::from_secs(config.timeout_seconds),
                )?,
                None => HttpInterpreter::from_config(&config)?,
            };
            let adapter = QueryAdapter::new(interpreter);

            let (session, pending) = Session::new().load(records).select(kind).begin_query(&text);
            let Some(pending) = pending else {
                println!("問い合わせ文が空のため何もしません");
                return Ok(());
            };

            println!("- 問い合わせ中: {}", adapter.interpreter().endpoint());
            let outcome = match adapter.resolve(pending).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    eprintln!("✖ クエリに失敗しました（表示は変更しません）");
                    return Err(e);
                }
            };
            let session = session.finish_query(outcome);
            print_active(&session, kind);

            if let Some(output) = output {
                write_output(&session, kind, &output, &config)?;
            }
        }

        Commands::Fields { kind } => {
            println!("{} のフィールド:", kind.label());
            for field in kind.fields() {
                println!("  {}", field);
            }
        }

        Commands::Config { set_endpoint, set_api_key, show } => {
            let mut config = config;

            if let Some(url) = set_endpoint {
                config.set_endpoint(url)?;
                println!("✔ クエリサービスのURLを設定しました");
            }

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  パス: {}", Config::config_path()?.display());
                match config.endpoint() {
                    Ok(url) => println!("  クエリURL: {}", url),
                    Err(_) => println!("  クエリURL: 未設定"),
                }
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  既定の出力形式: {}", config.default_export_format);
                println!("  APIキー: {}", if config.api_key().is_some() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_active(session: &Session, kind: TableKind) {
    let table = session.export_table(kind);
    let total = session.records(kind).len();

    if session.view_len(kind) == Some(0) {
        println!("\n該当する行がないため全件を表示します");
    }

    if table.is_empty() {
        println!("\n表示する行はありません（全{}行）", total);
        return;
    }

    println!("\n{}行 / 全{}行\n", table.rows.len(), total);
    print!("{}", table.render_text());
}

fn write_output(session: &Session, kind: TableKind, output: &Path, config: &Config) -> Result<()> {
    let default_format: ExportFormat = config
        .default_export_format
        .parse()
        .map_err(AlchemistError::Config)?;
    let format = export::format_for_path(output, default_format);
    let path = export::output_path_for_format(output, kind.as_str(), format);

    match export::export_table(&session.export_table(kind), format, &path, kind.label())? {
        Some(path) => println!("\n✔ 出力: {}", path.display()),
        None => println!("\n出力する行がないためファイルは作成しません"),
    }
    Ok(())
}
