//! Progress reporting for long renders.

/// A step of the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Parsing,
    Enriching,
    Writing,
    /// Macro engine started
    Macros,
    /// Macro engine marker `[*1]`
    FixingBreaks,
    /// Macro engine marker `[*2]`
    ExportingPdf,
    Merging,
}

impl Stage {
    /// Share of the progress bar, in percent, this stage advances.
    pub fn increment(&self) -> u32 {
        match self {
            Self::Parsing | Self::Enriching | Self::Writing => 10,
            Self::Macros | Self::FixingBreaks | Self::ExportingPdf => 20,
            Self::Merging => 40,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Parsing => "Разбираем исходный текст",
            Self::Enriching => "Применяем правила оформления",
            Self::Writing => "Записываем DOCX",
            Self::Macros => "Запускаем макросы",
            Self::FixingBreaks => "Исправляем разрывы страниц",
            Self::ExportingPdf => "Экспортируем в PDF",
            Self::Merging => "Склеиваем PDF",
        }
    }

    /// Stage announced by a `[*N]` marker in the macro engine output.
    pub fn from_marker(line: &str) -> Option<Self> {
        let start = line.find("[*")? + 2;
        let rest = &line[start..];
        let end = rest.find(']')?;
        match &rest[..end] {
            "1" => Some(Self::FixingBreaks),
            "2" => Some(Self::ExportingPdf),
            _ => None,
        }
    }
}

/// Receiver of progress updates.
pub trait Progress: Send {
    fn report(&mut self, stage: Stage);
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _stage: Stage) {}
}

impl<F: FnMut(Stage) + Send> Progress for F {
    fn report(&mut self, stage: Stage) {
        self(stage)
    }
}
