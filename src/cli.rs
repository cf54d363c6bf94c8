use clap::{Args, Parser, Subcommand};
use medscan_common::{AnalysisKind, ImageSettings};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medscan")]
#[command(about = "医用画像解析クライアント・レポート出力ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 解析種別 (brain-tumor/cancer/alzheimer)
    #[arg(short, long, default_value = "brain-tumor", global = true)]
    pub kind: AnalysisKind,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像をバックエンドへ送信して解析結果JSONを保存
    Analyze {
        /// 画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// 出力JSONファイル（デフォルト: <画像>.result.json）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 表示設定からエフェクト記述子を出力
    Render(RenderArgs),

    /// 解析結果の腫瘍領域を表示座標へ変換
    Overlay {
        /// 画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// 解析結果JSON
        #[arg(required = true)]
        result: PathBuf,
    },

    /// 解析結果からPDF/CSVを生成
    Export {
        /// 画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// 解析結果JSON
        #[arg(required = true)]
        result: PathBuf,

        /// 出力形式 (pdf/csv/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// 出力ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 解析から出力まで一括実行
    Run {
        /// 画像ファイル
        #[arg(required = true)]
        image: PathBuf,

        /// 出力形式 (pdf/csv/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// 出力ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// バックエンドURLを設定
        #[arg(long)]
        set_backend_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 表示設定の操作（指定順ではなく下記の固定順で適用）
#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    /// 明るさ (0-200)
    #[arg(long)]
    pub brightness: Option<f64>,

    /// コントラスト (0-200)
    #[arg(long)]
    pub contrast: Option<f64>,

    /// 左回転の回数
    #[arg(long, default_value = "0")]
    pub rotate_left: u8,

    /// 右回転の回数
    #[arg(long, default_value = "0")]
    pub rotate_right: u8,

    /// 拡大の回数
    #[arg(long, default_value = "0")]
    pub zoom_in: u8,

    /// 縮小の回数
    #[arg(long, default_value = "0")]
    pub zoom_out: u8,

    /// 左右反転
    #[arg(long)]
    pub flip_x: bool,

    /// 上下反転
    #[arg(long)]
    pub flip_y: bool,

    /// プレビューを作る元画像
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// プレビュー出力先（デフォルト: preview.png）
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl RenderArgs {
    pub fn settings(&self) -> ImageSettings {
        let mut settings = ImageSettings::default();
        if let Some(brightness) = self.brightness {
            settings = settings.with_brightness(brightness);
        }
        if let Some(contrast) = self.contrast {
            settings = settings.with_contrast(contrast);
        }
        for _ in 0..self.rotate_left {
            settings = settings.rotate_left();
        }
        for _ in 0..self.rotate_right {
            settings = settings.rotate_right();
        }
        for _ in 0..self.zoom_in {
            settings = settings.zoom_in();
        }
        for _ in 0..self.zoom_out {
            settings = settings.zoom_out();
        }
        if self.flip_x {
            settings = settings.toggle_flip_x();
        }
        if self.flip_y {
            settings = settings.toggle_flip_y();
        }
        settings
    }
}

#[derive(Clone, Debug, Default)]
pub enum ExportFormat {
    Pdf,
    Csv,
    #[default]
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "csv" => Ok(ExportFormat::Csv),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use pdf, csv, or both", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_parse() {
        assert!(matches!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Pdf)));
        assert!(matches!("csv".parse::<ExportFormat>(), Ok(ExportFormat::Csv)));
        assert!(matches!("both".parse::<ExportFormat>(), Ok(ExportFormat::Both)));
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_render_args_settings() {
        let args = RenderArgs {
            brightness: Some(300.0),
            rotate_left: 1,
            zoom_in: 10,
            flip_x: true,
            ..Default::default()
        };
        let settings = args.settings();
        assert_eq!(settings.brightness(), 200.0);
        assert_eq!(settings.normalized_rotation(), 270);
        assert_eq!(settings.scale(), 2.0);
        assert!(settings.flip_x());
        assert!(!settings.flip_y());
    }

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from(["medscan", "--kind", "cancer", "run", "scan.png", "-f", "csv"])
            .expect("パース失敗");
        assert_eq!(cli.kind, AnalysisKind::Cancer);
        assert!(matches!(cli.command, Commands::Run { format: ExportFormat::Csv, .. }));
    }
}
