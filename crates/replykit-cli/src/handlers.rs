//! Command handlers for CLI operations

use anyhow::{Result, bail};
use console::{Term, style};
use replykit_assistant::{
    CapsuleMachine, HistoryStore, KvStore, PromptOptions, ReplyAssistant, ReplyGenerator,
    ReplySource, daily_recommendations, detect_scene, filter_by_scene, filter_tags_by_scene,
    group_by_age_now, quick_tags,
};
use replykit_cli::config::{data_folder, load_config};
use replykit_cli::utils::{format_timestamp, history_line, preview, reply_line};
use replykit_core::{AssistantConfig, ReplyStyle, SceneType};
use replykit_providers::HttpChatProvider;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

use crate::cli::{Commands, HistoryCommand};

/// Log targets enabled when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str =
    "replykit=info,replykit_cli=info,replykit_assistant=info,replykit_providers=info,replykit_core=info";

/// Characters of a streaming reply shown on the progress line
const PROGRESS_PREVIEW_CHARS: usize = 60;

/// Shared state of one CLI invocation
struct Context {
    config: AssistantConfig,
    kv: KvStore,
    out: Term,
}

impl Context {
    fn history(&self) -> HistoryStore {
        HistoryStore::new(self.kv.clone()).with_max_items(self.config.history.max_items)
    }
}

/// Run a parsed command against the resolved data folder
///
/// # Errors
/// Returns an error if the data folder is unusable or the command fails
pub async fn run(data_dir: Option<PathBuf>, command: Commands) -> Result<()> {
    let data_dir = data_folder(data_dir)?;
    fs::create_dir_all(&data_dir)?;
    init_logging(&data_dir)?;

    let context = Context {
        config: load_config(&data_dir),
        kv: KvStore::open(&data_dir)?,
        out: Term::stdout(),
    };
    debug!("Using data folder {}", data_dir.display());

    match command {
        Commands::Generate {
            text,
            scene,
            intensity,
            relation,
        } => {
            let options = PromptOptions {
                intensity,
                relation,
            };
            handle_generate(&context, &text, scene, options).await
        }
        Commands::Detect { text } => handle_detect(&context, &text),
        Commands::Tags { scene } => handle_tags(&context, scene),
        Commands::Daily => handle_daily(&context),
        Commands::History(command) => handle_history(&context, command),
        Commands::Capsule => handle_capsule(&context),
    }
}

/// Send tracing output to `<data dir>/debug.log`, replacing the previous run's log
fn init_logging(data_dir: &Path) -> Result<()> {
    let debug_log = data_dir.join("debug.log");
    if debug_log.exists() {
        fs::remove_file(&debug_log)?;
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&debug_log)?;

    Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(
            fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false)
                .with_target(true)
                .with_level(true),
        )
        .init();

    Ok(())
}

/// Generate and print the three replies, streaming progress to stderr
async fn handle_generate(
    context: &Context,
    text: &str,
    scene: Option<SceneType>,
    options: PromptOptions,
) -> Result<()> {
    let provider = HttpChatProvider::from_config(&context.config.api);
    let generator = ReplyGenerator::new(Arc::new(provider), context.config.api.timeout());
    let assistant = ReplyAssistant::new(generator, context.history());

    let progress = Term::stderr();
    let live = progress.is_term();
    let mut on_progress = |reply_style: ReplyStyle, content: &str| {
        if !live {
            return;
        }
        let line = format!(
            "{} {}",
            style(format!("[{}]", reply_style.label())).cyan(),
            preview(content, PROGRESS_PREVIEW_CHARS)
        );
        if let Err(error) = progress
            .clear_line()
            .and_then(|()| progress.write_str(&line))
        {
            debug!("Failed to render progress: {error}");
        }
    };

    let composition = assistant
        .compose(text, scene, options, &mut on_progress)
        .await?;
    if live {
        progress.clear_line()?;
    }

    let out = &context.out;
    out.write_line(&format!(
        "场景: {} ({})",
        composition.scene.label(),
        composition.scene
    ))?;
    for reply in &composition.replies {
        out.write_line(&reply_line(reply))?;
    }

    match composition.source {
        ReplySource::Generated => {
            info!("Generated {} replies", composition.replies.len());
            if let Some(id) = &composition.history_id {
                out.write_line(&style(format!("已保存到历史记录: {id}")).dim().to_string())?;
            }
        }
        ReplySource::Fallback => {
            out.write_line(&style("网络开小差了，已使用默认回复").yellow().to_string())?;
            if let Some(error) = &composition.error {
                out.write_line(&style(error).dim().to_string())?;
            }
        }
    }

    Ok(())
}

fn handle_detect(context: &Context, text: &str) -> Result<()> {
    let scene = detect_scene(text);
    context
        .out
        .write_line(&format!("{} ({scene})", scene.label()))?;
    Ok(())
}

fn handle_tags(context: &Context, scene: Option<SceneType>) -> Result<()> {
    let tags = filter_tags_by_scene(&quick_tags(), scene.unwrap_or(SceneType::All));
    for tag in tags {
        context.out.write_line(&format!(
            "[{}] {}: {}",
            tag.scene.label(),
            tag.label,
            tag.prompt
        ))?;
    }
    Ok(())
}

fn handle_daily(context: &Context) -> Result<()> {
    for tip in daily_recommendations() {
        context
            .out
            .write_line(&style(format!("{} [{}]", tip.title, tip.scene.label())).bold().to_string())?;
        context.out.write_line(&format!("  {}", tip.content))?;
    }
    Ok(())
}

fn handle_history(context: &Context, command: HistoryCommand) -> Result<()> {
    let history = context.history();
    let out = &context.out;

    match command {
        HistoryCommand::List { scene, favorites } => {
            let mut items = if favorites {
                history.favorites()
            } else {
                history.list()
            };
            if let Some(scene) = scene {
                items = filter_by_scene(items, scene);
            }
            if items.is_empty() {
                out.write_line("暂无历史记录")?;
                return Ok(());
            }

            let groups = group_by_age_now(items);
            for (title, group) in groups.labeled() {
                out.write_line(&style(title).bold().to_string())?;
                for item in group {
                    out.write_line(&format!("  {}", history_line(item)))?;
                }
            }
        }
        HistoryCommand::Show { id } => {
            let Some(item) = history.get(&id) else {
                bail!("History item {id} not found");
            };
            out.write_line(&format!(
                "{} [{}] {}",
                item.id,
                item.scene.label(),
                format_timestamp(item.timestamp)
            ))?;
            out.write_line(&item.input)?;
            for reply in &item.replies {
                out.write_line(&reply_line(reply))?;
            }
        }
        HistoryCommand::Delete { id } => {
            if history.get(&id).is_none() {
                bail!("History item {id} not found");
            }
            history.delete(&id)?;
            out.write_line(&format!("已删除 {id}"))?;
        }
        HistoryCommand::Favorite { id } => {
            if history.get(&id).is_none() {
                bail!("History item {id} not found");
            }
            let favorite = history.toggle_favorite(&id)?;
            out.write_line(if favorite { "已收藏" } else { "已取消收藏" })?;
        }
        HistoryCommand::Clear => {
            history.clear()?;
            out.write_line("已清空")?;
        }
        HistoryCommand::Stats => {
            let stats = history.stats();
            out.write_line(&format!("总计: {}", stats.total))?;
            out.write_line(&format!("收藏: {}", stats.favorites))?;
            for scene in SceneType::CONCRETE {
                let count = stats.by_scene.get(&scene.to_string()).copied().unwrap_or(0);
                out.write_line(&format!("{}: {count}", scene.label()))?;
            }
        }
    }

    Ok(())
}

fn handle_capsule(context: &Context) -> Result<()> {
    let draw = CapsuleMachine::new(context.kv.clone()).draw()?;
    let out = &context.out;

    let title = format!("{} {}", draw.template.icon, draw.template.title);
    if draw.golden {
        out.write_line(&style(format!("{title} (金色扭蛋!)")).yellow().bold().to_string())?;
    } else {
        out.write_line(&style(title).bold().to_string())?;
    }
    out.write_line(&draw.template.text())?;
    out.write_line(&style(format!("已抽取 {} 次", draw.usage_count)).dim().to_string())?;

    Ok(())
}
