use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use i18nedt::discovery::Discovery;
use i18nedt::editor::{apply, default_editor, open_editor, validate_editor, ApplyReport, EditBuffer, EditSession};
use i18nedt::io::{DefaultDocumentReader, DefaultDocumentWriter, DocumentReader};
use i18nedt::{discover_files, doctor, flatten, DocumentSet, I18nError, SUPPORTED_EXTENSIONS};

#[derive(Parser)]
#[command(name = "i18nedt")]
#[command(about = "在一个编辑器缓冲区中批量编辑多个语言 JSON 文件中的翻译键")]
#[command(version)]
struct Cli {
    /// 语言文件路径或路径模板（如 locales/{{language}}/{{ns}}.json）
    #[arg(env = "I18NEDT_FILES", value_delimiter = ' ')]
    files: Vec<String>,

    /// 要编辑的键，可重复；`namespace:key` 限定命名空间
    #[arg(short, long = "key")]
    keys: Vec<String>,

    /// 只把缓冲区打印到标准输出，不启动编辑器、不写文件
    #[arg(short, long)]
    print: bool,

    /// 缓冲区中不包含提示行
    #[arg(short = 'a', long, env = "I18NEDT_NO_TIPS")]
    no_tips: bool,

    /// 用完整文件路径作为语言标识
    #[arg(short = 'P', long)]
    path_as_locale: bool,

    /// 编辑器命令（默认 $EDITOR，其次 $VISUAL，最后 vim）
    #[arg(short, long)]
    editor: Option<String>,

    /// 把文件展开为 key=value 形式输出
    #[arg(short, long)]
    flatten: bool,

    /// 检查各语言之间缺失的键与空值
    #[arg(long)]
    doctor: bool,

    /// 检查结果只输出问题键列表
    #[arg(long)]
    simple: bool,

    /// 写入前为被修改的文件创建备份
    #[arg(long)]
    backup: bool,

    /// 静默模式(仅输出错误)
    #[arg(short, long)]
    quiet: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn is_edit_mode(&self) -> bool {
        !(self.print || self.flatten || self.doctor)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let discovery = discover_files(&cli.files).context("无法确定要加载的语言文件")?;
    tracing::debug!("待处理文件: {:?}", discovery.paths().collect::<Vec<_>>());
    warn_unsupported_files(&discovery);

    if cli.flatten {
        return handle_flatten(&discovery);
    }

    // 编辑器不可用时在读取任何文件之前失败
    let editor = if cli.is_edit_mode() {
        let command = cli.editor.clone().unwrap_or_else(default_editor);
        validate_editor(&command)?;
        Some(command)
    } else {
        None
    };

    let mut documents = DocumentSet::load(&discovery.sources, &DefaultDocumentReader, cli.path_as_locale)
        .context("加载语言文件失败")?;
    tracing::debug!(
        "已加载 {} 个文件，语言: {:?}，命名空间: {:?}",
        documents.len(),
        documents.locales(),
        documents.namespaces()
    );

    if cli.doctor {
        return handle_doctor(&documents, cli.simple);
    }

    if cli.keys.is_empty() {
        return Err(I18nError::NoKeys.into());
    }

    let created = documents
        .create_missing_namespaces(&cli.keys, &discovery.templates)
        .context("创建命名空间文件失败")?;
    if !created.is_empty() {
        tracing::info!("新建命名空间: {}", created.join(", "));
    }

    match editor {
        Some(command) => handle_edit(&cli, &mut documents, &command),
        None => {
            let buffer = EditBuffer::serialize(&documents, &cli.keys);
            print!("{}", buffer.render(!cli.no_tips));
            Ok(())
        }
    }
}

/// 初始化日志：`I18NEDT_LOG` 优先，否则 `-v` 为 debug，默认 warn
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("I18NEDT_LOG").unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// 普通路径参数的扩展名检查（只警告）
fn warn_unsupported_files(discovery: &Discovery) {
    for source in discovery.sources.iter().filter(|s| s.pattern.is_none()) {
        let extension = source
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());
        if !SUPPORTED_EXTENSIONS.iter().any(|&ext| Some(ext) == extension.as_deref()) {
            tracing::warn!("{} 不是 JSON 文件，仍按 JSON 读取", source.path.display());
        }
    }
}

/// 处理扁平化输出：逐个读取发现的文件，不做语言去重
fn handle_flatten(discovery: &Discovery) -> anyhow::Result<()> {
    let reader = DefaultDocumentReader;
    for source in &discovery.sources {
        let data = reader
            .read(&source.path)?
            .with_context(|| format!("文件不存在: {}", source.path.display()))?;
        let namespace = source
            .pattern
            .as_ref()
            .and_then(|pattern| pattern.extract(&source.path))
            .map(|(_, namespace)| namespace)
            .unwrap_or_default();
        let flat = flatten::flatten_json(&data, &namespace)
            .with_context(|| format!("无法展开 {}", source.path.display()))?;
        print!("{}", flatten::render_flat(&flat));
    }
    Ok(())
}

/// 处理完整性检查
fn handle_doctor(documents: &DocumentSet, simple: bool) -> anyhow::Result<()> {
    let results = doctor::check(documents)?;
    print!("{}", doctor::render_report(&results, simple));
    Ok(())
}

/// 处理编辑模式
fn handle_edit(cli: &Cli, documents: &mut DocumentSet, editor: &str) -> anyhow::Result<()> {
    let mut session = EditSession::new(documents, &cli.keys, !cli.no_tips);

    let result = run_session(cli, &mut session, documents, editor);

    // 无论成功与否都删除临时文件
    if let Err(e) = session.cleanup() {
        tracing::warn!("无法删除临时文件 {}: {}", session.path().display(), e);
    }

    let (report, written) = result?;
    if !cli.quiet {
        print_summary(&report, written);
    }
    Ok(())
}

fn run_session(
    cli: &Cli,
    session: &mut EditSession,
    documents: &mut DocumentSet,
    editor: &str,
) -> anyhow::Result<(ApplyReport, usize)> {
    session.write().context("无法写入临时文件")?;
    open_editor(session.path(), editor)?;

    let changes = session.read()?.clone();
    let report = apply(documents, &changes)?;
    for document in documents.iter().filter(|d| d.is_dirty()) {
        for change in report.get_changes_for_document(&document.path) {
            tracing::debug!("{}", change);
        }
    }

    if cli.backup {
        for backup in documents.backup_dirty().context("创建备份失败")? {
            tracing::info!("已备份到 {}", backup.display());
        }
    }

    let written = documents
        .persist(&DefaultDocumentWriter)
        .context("写入语言文件失败")?;
    Ok((report, written))
}

fn print_summary(report: &ApplyReport, written: usize) {
    if report.is_empty() {
        println!("没有任何修改");
        return;
    }

    let deleted = report.deleted_keys();
    if !deleted.is_empty() {
        println!("已删除 {} 个键:", deleted.len());
        for key in &deleted {
            println!("  - {}", key);
        }
    }
    println!("已更新 {} 个值", report.updated_count());
    println!("已写入 {} 个文件", written);
}
