//! md2gost CLI - render report markup to DOCX or PDF

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use md2gost::config::RenderOptions;
use md2gost::render::{Progress, Renderer, Stage};

#[derive(Parser)]
#[command(name = "md2gost")]
#[command(version)]
#[command(about = "Render report markup into a GOST-styled Word document", long_about = None)]
struct Cli {
    /// Source markup file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Also export a PDF through the macro engine
    #[arg(long)]
    pdf: bool,

    /// Configuration file (defaults to md2gost.yaml next to FILE)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip the macro engine even for documents with code blocks
    #[arg(long)]
    no_macros: bool,
}

/// Prints each stage with a randomly picked phrase.
struct ConsoleProgress {
    percent: u32,
}

impl ConsoleProgress {
    fn phrases(stage: Stage) -> &'static [&'static str] {
        match stage {
            Stage::Parsing => &["Пытаемся понять, что вы тут написали..."],
            Stage::Enriching => &["Колдуем над синтаксисом..."],
            Stage::Writing => &[
                "Материализуем бумажный артефакт...",
                "Куем DOCX в текстовой кузнице...",
                "Плетем полотно документа...",
                "Трансмутируем простые символы в величественные страницы...",
            ],
            Stage::Macros => &[
                "Пробуждаем древних духов VBA...",
                "Призываем дух Ворда из бездны офисного пакета...",
            ],
            Stage::FixingBreaks => &[
                "Подклеиваем \"продолжение листинга\" на разорванные страницы...",
                "Укрепляем стены секций связующими словами...",
                "Наносим руны преемственности на разрывы страниц...",
            ],
            Stage::ExportingPdf => &[
                "Собираем документы и превращаем их в PDF-свитки...",
                "Обращаем живое слово в незыблемый камень PDF...",
                "Навеки запечатлеваем свитки в кристаллах памяти...",
            ],
            Stage::Merging => &[
                "Склеиваем всё синей изолентой...",
                "Скрепляем печатями судьбы последнюю страницу...",
                "Сплавляем финальный артефакт из множества осколков...",
            ],
        }
    }
}

impl Progress for ConsoleProgress {
    fn report(&mut self, stage: Stage) {
        self.percent = (self.percent + stage.increment()).min(100);
        let phrases = Self::phrases(stage);
        let phrase = phrases[rand::random::<u32>() as usize % phrases.len()];
        eprintln!("[{:>3}%] {phrase}", self.percent);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let options = match &cli.config {
        Some(path) => RenderOptions::load(path),
        None => {
            let dir = cli.input.parent().map(PathBuf::from).unwrap_or_default();
            RenderOptions::discover(dir)
        },
    };
    let options = match options {
        Ok(options) => options,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        },
    };
    let mut options = options;
    if cli.pdf {
        options = options.with_render_pdf(true);
    }
    if cli.no_macros {
        options = options.with_macros(false);
    }

    let renderer = Renderer::new(options);
    let mut progress = ConsoleProgress { percent: 0 };
    match renderer.render(&cli.input, &mut progress).await {
        Ok(outcome) => {
            for diagnostic in &outcome.diagnostics {
                eprintln!("warning: {diagnostic}");
            }
            println!("File rendered to {}", outcome.output.display());
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}
