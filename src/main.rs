use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use medscan::cli::{Cli, Commands};
use medscan::client::{request_analysis, HttpAnalysisClient};
use medscan::config::Config;
use medscan::export::{DirectorySink, ReportContext};
use medscan::{image_source, pipeline, raster};
use medscan_common::{render_effect, AnalysisKind, AnalysisOutcome, Session};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG があればそちらを優先
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::load().context("設定の読み込みに失敗")?;

    match cli.command {
        Commands::Analyze { image, output } => {
            println!("🧠 medscan - 画像解析 ({})", cli.kind.title());
            println!("   {}\n", cli.kind.description());
            let outcome = analyze(&config, cli.kind, &image).await?;

            let output = output.unwrap_or_else(|| image.with_extension("result.json"));
            let json = serde_json::to_string_pretty(&outcome)?;
            std::fs::write(&output, json)
                .with_context(|| format!("結果の保存に失敗: {}", output.display()))?;

            match outcome.error() {
                Some(error) => println!("✘ {}", error),
                None => println!("✔ 結果を保存: {}", output.display()),
            }
        }

        Commands::Render(args) => {
            let settings = args.settings();
            let effect = render_effect(&settings);
            println!("filter: {}", effect.filter);
            println!("transform: {}", effect.transform);

            if let Some(source) = &args.preview {
                let img = image_source::open_image(source)?;
                let preview = raster::apply_effect(&img, &effect);
                let output = args.output.clone().unwrap_or_else(|| PathBuf::from("preview.png"));
                preview
                    .save(&output)
                    .with_context(|| format!("プレビューの保存に失敗: {}", output.display()))?;
                println!("✔ プレビュー出力: {}", output.display());
            }
        }

        Commands::Overlay { image, result } => {
            let outcome = read_outcome(&result)?;
            let overlay = pipeline::overlay_for(&image, &outcome, config.container_width).await;
            println!("{}", serde_json::to_string_pretty(&overlay)?);
        }

        Commands::Export { image, result, format, output } => {
            println!("📄 medscan - レポート出力\n");
            let outcome = read_outcome(&result)?;
            let ctx = report_context(&config, cli.kind);
            let mut sink = DirectorySink::new(output_dir(&config, output));

            let summary = pipeline::export_saved(
                &image,
                &outcome,
                &ctx,
                &format,
                config.container_width,
                &mut sink,
            )
            .await?;

            if summary.pdf.is_some() || summary.csv.is_some() {
                println!("\n✅ 出力完了");
            }
        }

        Commands::Run { image, format, output } => {
            println!("🧠 medscan - 解析＋レポート出力 ({})", cli.kind.title());
            println!("   {}\n", cli.kind.description());
            let client = HttpAnalysisClient::new(config.backend_url(), config.timeout_seconds)?;
            let ctx = report_context(&config, cli.kind);
            let mut sink = DirectorySink::new(output_dir(&config, output));

            let (session, summary) = pipeline::run_session(
                &client,
                &image,
                &ctx,
                &format,
                config.container_width,
                &mut sink,
            )
            .await?;

            if let Some(result) = session.outcome().and_then(|o| o.result()) {
                println!(
                    "\n{} ({:.2}%)",
                    ctx.labels.verdict_text(result.tumor_detected),
                    result.confidence * 100.0
                );
            }
            if summary.pdf.is_some() || summary.csv.is_some() {
                println!("\n✅ 出力完了");
            }
        }

        Commands::Config { set_backend_url, show } => {
            if let Some(url) = set_backend_url {
                config.set_backend_url(url)?;
                println!("✔ バックエンドURLを設定しました");
            }

            if show {
                println!("設定ファイル: {}", Config::config_path()?.display());
                println!("バックエンドURL: {}", config.backend_url());
                println!("タイムアウト: {}秒", config.timeout_seconds);
                println!("表示幅: {}px", config.container_width);
                println!("PDF倍率: {}", config.supersample);
                println!("JPEG品質: {}", config.jpeg_quality);
                match &config.output_dir {
                    Some(dir) => println!("出力先: {}", dir.display()),
                    None => println!("出力先: (カレントディレクトリ)"),
                }
            }
        }
    }

    Ok(())
}

/// 1回分の解析。セッションで種別の可否と二重送信を確認してから送る
async fn analyze(config: &Config, kind: AnalysisKind, image: &Path) -> anyhow::Result<AnalysisOutcome> {
    image_source::check_image_file(image, kind)?;

    let mut session = Session::with_container_width(kind, config.container_width);
    session.select_image(image.display().to_string());
    let ticket = session.begin_analysis()?;

    let client = HttpAnalysisClient::new(config.backend_url(), config.timeout_seconds)?;
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.set_message(format!("解析中... {}", client.endpoint_url(kind)));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let outcome = request_analysis(&client, kind, image).await;
    spinner.finish_and_clear();

    session.complete_analysis(ticket, outcome);
    session
        .outcome()
        .cloned()
        .context("解析結果がありません")
}

fn read_outcome(path: &Path) -> anyhow::Result<AnalysisOutcome> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("解析結果を読み込めません: {}", path.display()))?;
    let outcome = serde_json::from_str(&content)
        .with_context(|| format!("解析結果のJSONが不正です: {}", path.display()))?;
    Ok(outcome)
}

fn report_context(config: &Config, kind: AnalysisKind) -> ReportContext {
    let mut ctx = ReportContext::new(kind);
    ctx.labels = config.labels.clone();
    ctx.pdf.supersample = config.supersample;
    ctx.pdf.jpeg_quality = config.jpeg_quality;
    ctx
}

fn output_dir(config: &Config, output: Option<PathBuf>) -> PathBuf {
    output
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}
