//! Localized text for the presentation layer.
//!
//! Catalogs are plain `static` structs, so every language must provide
//! every string. The download core never sees these strings; it works on
//! stable keys and structured [`StatusMessage`]s that are rendered here.

use std::collections::BTreeMap;

use crate::downloader::errors::DownloadError;
use crate::downloader::models::{MediaFormat, Quality, Severity, StatusMessage, StatusUpdate, Target};
use crate::downloader::traits::StatusSink;

pub struct Catalog {
    pub tag: &'static str,
    pub display: &'static str,
    pub format_label: &'static str,
    pub quality_video_label: &'static str,
    pub quality_audio_label: &'static str,
    pub error_no_url: &'static str,
    pub error_busy: &'static str,
    pub error_output_dir: &'static str,
    pub status_preparing: &'static str,
    pub status_streaming: &'static str,
    pub status_executing: &'static str,
    pub success_streaming: &'static str,
    pub success_general: &'static str,
    pub error_exec: &'static str,
    pub error_not_found: &'static str,
    pub error_unexpected: &'static str,
    /// In `MediaFormat::ALL` order
    pub formats: [&'static str; 6],
    /// In `Quality::ALL` order
    pub qualities: [&'static str; 6],
}

impl Catalog {
    pub fn format_name(&self, format: MediaFormat) -> &'static str {
        self.formats[format as usize]
    }

    pub fn quality_name(&self, quality: Quality) -> &'static str {
        self.qualities[quality as usize]
    }

    /// Accepts a stable key or this catalog's display name
    pub fn format_from_display(&self, text: &str) -> Option<MediaFormat> {
        let text = text.trim();
        MediaFormat::from_key(text).or_else(|| {
            MediaFormat::ALL
                .into_iter()
                .find(|f| self.format_name(*f).eq_ignore_ascii_case(text))
        })
    }

    pub fn quality_from_display(&self, text: &str) -> Option<Quality> {
        let text = text.trim();
        Quality::from_key(text).or_else(|| {
            Quality::ALL
                .into_iter()
                .find(|q| self.quality_name(*q).eq_ignore_ascii_case(text))
        })
    }
}

pub static EN: Catalog = Catalog {
    tag: "en",
    display: "en (English)",
    format_label: "Select Output Format:",
    quality_video_label: "Select Video Quality:",
    quality_audio_label: "Select Audio Quality:",
    error_no_url: "⚠️ Please enter a URL!",
    error_busy: "⚠️ A download is already in progress.",
    error_output_dir: "⚠️ Output folder does not exist:",
    status_preparing: "Preparing download command...",
    status_streaming: "Processing Spotify link...",
    status_executing: "Executing download and conversion...",
    success_streaming: "✅ Spotify song downloaded successfully! File saved to:",
    success_general: "✅ Content downloaded and converted successfully! File saved to:",
    error_exec: "Execution failed with code:",
    error_not_found: "❌ ERROR: yt-dlp, ffmpeg, or spotdl not found. Check files in the same directory.",
    error_unexpected: "❌ An unexpected error occurred:",
    formats: ["MP3 (Audio)", "FLAC (Lossless)", "AAC (Audio)", "MP4 (Video)", "MOV (Video)", "WebM (Video)"],
    qualities: [
        "Highest Quality (Best)",
        "1080p (FHD)",
        "720p (HD)",
        "Best Quality (VBR)",
        "High Quality (VBR)",
        "Medium Quality (CBR)",
    ],
};

pub static ZH_TW: Catalog = Catalog {
    tag: "zh_TW",
    display: "zh_TW (繁體中文)",
    format_label: "選擇輸出格式:",
    quality_video_label: "選擇畫質:",
    quality_audio_label: "選擇音質:",
    error_no_url: "⚠️ 請輸入網址！",
    error_busy: "⚠️ 已有下載正在進行中。",
    error_output_dir: "⚠️ 輸出資料夾不存在:",
    status_preparing: "正在準備下載命令...",
    status_streaming: "正在處理 Spotify 連結...",
    status_executing: "正在執行下載和轉換...",
    success_streaming: "✅ Spotify 歌曲下載成功！檔案儲存在:",
    success_general: "✅ 網站內容下載與轉換成功！檔案儲存在:",
    error_exec: "執行失敗，錯誤碼:",
    error_not_found: "❌ 錯誤: 找不到 yt-dlp, ffmpeg, 或 spotdl。請檢查同目錄檔案。",
    error_unexpected: "❌ 發生未預期的錯誤:",
    formats: ["MP3 (音頻)", "FLAC (無損)", "AAC (音頻)", "MP4 (視訊)", "MOV (視訊)", "WebM (視訊)"],
    qualities: [
        "最高畫質 (Best)",
        "1080p (FHD)",
        "720p (HD)",
        "最高音質 (Best/VBR)",
        "高品質 (High/VBR)",
        "中等品質 (Medium/CBR)",
    ],
};

pub static ZH_CN: Catalog = Catalog {
    tag: "zh_CN",
    display: "zh_CN (简体中文)",
    format_label: "选择输出格式:",
    quality_video_label: "选择画质:",
    quality_audio_label: "选择音质:",
    error_no_url: "⚠️ 请输入网址！",
    error_busy: "⚠️ 已有下载正在进行中。",
    error_output_dir: "⚠️ 输出文件夹不存在:",
    status_preparing: "正在准备下载命令...",
    status_streaming: "正在处理 Spotify 链接...",
    status_executing: "正在执行下载和转换...",
    success_streaming: "✅ Spotify 歌曲下载成功！文件存储在:",
    success_general: "✅ 网站内容下载与转换成功！文件存储在:",
    error_exec: "执行失败，错误码:",
    error_not_found: "❌ 错误: 找不到 yt-dlp, ffmpeg, 或 spotdl。请检查同目录文件。",
    error_unexpected: "❌ 发生未预期的错误:",
    formats: ["MP3 (音频)", "FLAC (无损)", "AAC (音频)", "MP4 (视频)", "MOV (视频)", "WebM (视频)"],
    qualities: [
        "最高画质 (Best)",
        "1080p (FHD)",
        "720p (HD)",
        "最高音质 (Best/VBR)",
        "高品质 (High/VBR)",
        "中等品质 (Medium/CBR)",
    ],
};

pub static JA: Catalog = Catalog {
    tag: "ja",
    display: "ja (日本語)",
    format_label: "出力形式を選択:",
    quality_video_label: "画質を選択:",
    quality_audio_label: "音質を選択:",
    error_no_url: "⚠️ URLを入力してください！",
    error_busy: "⚠️ ダウンロードはすでに実行中です。",
    error_output_dir: "⚠️ 出力フォルダが存在しません:",
    status_preparing: "ダウンロードコマンドを準備中...",
    status_streaming: "Spotifyリンクを処理中...",
    status_executing: "ダウンロードと変換を実行中...",
    success_streaming: "✅ Spotify楽曲のダウンロードに成功しました！保存先:",
    success_general: "✅ コンテンツのダウンロードと変換に成功しました！保存先:",
    error_exec: "実行に失敗しました。エラーコード:",
    error_not_found: "❌ エラー: yt-dlp、ffmpeg、または spotdl が見つかりません。",
    error_unexpected: "❌ 予期せぬエラーが発生しました:",
    formats: ["MP3 (オーディオ)", "FLAC (ロスレス)", "AAC (オーディオ)", "MP4 (ビデオ)", "MOV (ビデオ)", "WebM (ビデオ)"],
    qualities: [
        "最高画質 (Best)",
        "1080p (FHD)",
        "720p (HD)",
        "最高音質 (Best/VBR)",
        "高音質 (High/VBR)",
        "中音質 (Medium/CBR)",
    ],
};

pub static FR: Catalog = Catalog {
    tag: "fr",
    display: "fr (Français)",
    format_label: "Sélectionner le format:",
    quality_video_label: "Sélectionner la qualité vidéo:",
    quality_audio_label: "Sélectionner la qualité audio:",
    error_no_url: "⚠️ Veuillez entrer une URL!",
    error_busy: "⚠️ Un téléchargement est déjà en cours.",
    error_output_dir: "⚠️ Le dossier de sortie n'existe pas:",
    status_preparing: "Préparation de la commande...",
    status_streaming: "Traitement du lien Spotify...",
    status_executing: "Exécution du téléchargement...",
    success_streaming: "✅ Chanson Spotify téléchargée avec succès ! Enregistrée dans:",
    success_general: "✅ Contenu téléchargé et converti avec succès ! Enregistré dans:",
    error_exec: "Échec de l'exécution, code :",
    error_not_found: "❌ ERREUR : yt-dlp, ffmpeg, ou spotdl introuvable.",
    error_unexpected: "❌ Une erreur inattendue s'est produite:",
    formats: ["MP3 (Audio)", "FLAC (Sans perte)", "AAC (Audio)", "MP4 (Vidéo)", "MOV (Vidéo)", "WebM (Vidéo)"],
    qualities: [
        "Meilleure Qualité (Best)",
        "1080p (FHD)",
        "720p (HD)",
        "Meilleure Qualité (VBR)",
        "Haute Qualité (VBR)",
        "Qualité Moyenne (CBR)",
    ],
};

pub static DE: Catalog = Catalog {
    tag: "de",
    display: "de (Deutsch)",
    format_label: "Ausgabeformat wählen:",
    quality_video_label: "Videoqualität wählen:",
    quality_audio_label: "Audioqualität wählen:",
    error_no_url: "⚠️ Bitte geben Sie eine URL ein!",
    error_busy: "⚠️ Es läuft bereits ein Download.",
    error_output_dir: "⚠️ Ausgabeordner existiert nicht:",
    status_preparing: "Download-Befehl wird vorbereitet...",
    status_streaming: "Spotify-Link wird verarbeitet...",
    status_executing: "Download wird ausgeführt...",
    success_streaming: "✅ Spotify-Song erfolgreich heruntergeladen! Gespeichert unter:",
    success_general: "✅ Inhalt erfolgreich heruntergeladen und konvertiert! Gespeichert unter:",
    error_exec: "Ausführung fehlgeschlagen, Code:",
    error_not_found: "❌ FEHLER: yt-dlp, ffmpeg oder spotdl nicht gefunden.",
    error_unexpected: "❌ Ein unerwarteter Fehler ist aufgetreten:",
    formats: ["MP3 (Audio)", "FLAC (Verlustfrei)", "AAC (Audio)", "MP4 (Video)", "MOV (Video)", "WebM (Video)"],
    qualities: [
        "Höchste Qualität (Best)",
        "1080p (FHD)",
        "720p (HD)",
        "Beste Qualität (VBR)",
        "Hohe Qualität (VBR)",
        "Mittlere Qualität (CBR)",
    ],
};

pub static ES: Catalog = Catalog {
    tag: "es",
    display: "es (Español)",
    format_label: "Seleccionar formato de salida:",
    quality_video_label: "Seleccionar Calidad de Video:",
    quality_audio_label: "Seleccionar Calidad de Audio:",
    error_no_url: "⚠️ ¡Por favor, introduzca una URL!",
    error_busy: "⚠️ Ya hay una descarga en curso.",
    error_output_dir: "⚠️ La carpeta de salida no existe:",
    status_preparing: "Preparando comando de descarga...",
    status_streaming: "Procesando enlace de Spotify...",
    status_executing: "Ejecutando descarga...",
    success_streaming: "✅ Canción de Spotify descargada con éxito! Guardada en:",
    success_general: "✅ Contenido descargado y convertido con éxito! Guardado en:",
    error_exec: "Falló la ejecución, código:",
    error_not_found: "❌ ERROR: yt-dlp, ffmpeg o spotdl no encontrados.",
    error_unexpected: "❌ Ocurrió un error inesperado:",
    formats: ["MP3 (Audio)", "FLAC (Sin pérdida)", "AAC (Audio)", "MP4 (Video)", "MOV (Video)", "WebM (Video)"],
    qualities: [
        "Máxima Calidad (Best)",
        "1080p (FHD)",
        "720p (HD)",
        "Mejor Calidad (VBR)",
        "Alta Calidad (VBR)",
        "Calidad Media (CBR)",
    ],
};

pub static RU: Catalog = Catalog {
    tag: "ru",
    display: "ru (Русский)",
    format_label: "Выберите формат вывода:",
    quality_video_label: "Выберите качество видео:",
    quality_audio_label: "Выберите качество аудио:",
    error_no_url: "⚠️ Пожалуйста, введите URL!",
    error_busy: "⚠️ Загрузка уже выполняется.",
    error_output_dir: "⚠️ Папка вывода не существует:",
    status_preparing: "Подготовка команды загрузки...",
    status_streaming: "Обработка ссылки Spotify...",
    status_executing: "Выполнение загрузки...",
    success_streaming: "✅ Песня Spotify успешно загружена! Сохранено в:",
    success_general: "✅ Контент успешно загружен и конвертирован! Сохранено в:",
    error_exec: "Сбой выполнения, код:",
    error_not_found: "❌ ОШИБКА: yt-dlp, ffmpeg или spotdl не найдены.",
    error_unexpected: "❌ Произошла непредвиденная ошибка:",
    formats: ["MP3 (Аудио)", "FLAC (Без потерь)", "AAC (Аудио)", "MP4 (Видео)", "MOV (Видео)", "WebM (Видео)"],
    qualities: [
        "Максимальное Качество (Best)",
        "1080p (FHD)",
        "720p (HD)",
        "Лучшее Качество (VBR)",
        "Высокое Качество (VBR)",
        "Среднее Качество (CBR)",
    ],
};

/// Every shipped catalog
pub static CATALOGS: &[&Catalog] = &[&EN, &ZH_TW, &ZH_CN, &JA, &FR, &DE, &ES, &RU];

/// Exact tag lookup (`zh_TW`, `en`, ...)
pub fn catalog(tag: &str) -> Option<&'static Catalog> {
    CATALOGS.iter().copied().find(|c| c.tag == tag)
}

/// Strip `.UTF-8` / `@euro` and normalize `zh-TW` to `zh_TW`
fn normalize_locale(locale: &str) -> String {
    let base = locale
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim()
        .replace('-', "_");

    // Region is upper-case by convention
    match base.split_once('_') {
        Some((lang, region)) => format!("{}_{}", lang.to_lowercase(), region.to_uppercase()),
        None => base.to_lowercase(),
    }
}

/// Pick the catalog for a locale string
///
/// Order: exact tag, configured alias, primary language subtag, fallback.
/// An unknown fallback ends at English.
pub fn resolve_language(
    locale: Option<&str>,
    aliases: &BTreeMap<String, String>,
    fallback: &str,
) -> &'static Catalog {
    let fallback_catalog = || catalog(fallback).unwrap_or(&EN);

    let Some(locale) = locale.map(normalize_locale).filter(|l| !l.is_empty()) else {
        return fallback_catalog();
    };
    if locale == "c" || locale == "posix" {
        return fallback_catalog();
    }

    if let Some(found) = catalog(&locale) {
        return found;
    }

    let primary = locale.split('_').next().unwrap_or_default();
    for key in [locale.as_str(), primary] {
        if let Some(found) = aliases.get(key).and_then(|tag| catalog(tag)) {
            return found;
        }
    }

    catalog(primary).unwrap_or_else(fallback_catalog)
}

/// Locale from the environment, in POSIX precedence order
pub fn detect_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
}

/// Localized text for a status checkpoint
pub fn render(catalog: &Catalog, message: &StatusMessage) -> String {
    match message {
        StatusMessage::Preparing => catalog.status_preparing.to_string(),
        StatusMessage::ProcessingStreaming => catalog.status_streaming.to_string(),
        StatusMessage::ExecutingGeneral => catalog.status_executing.to_string(),
        StatusMessage::Succeeded { target, output_dir } => {
            let prefix = match target {
                Target::StreamingService => catalog.success_streaming,
                Target::GeneralFetcher => catalog.success_general,
            };
            format!("{} {}", prefix, output_dir.display())
        }
        StatusMessage::Failed {
            tool,
            exit_code,
            diagnostic,
        } => format!("❌ {} {} {}\n{}", tool, catalog.error_exec, exit_code, diagnostic),
        StatusMessage::ToolMissing { .. } => catalog.error_not_found.to_string(),
        StatusMessage::Unexpected { detail } => format!("{} {}", catalog.error_unexpected, detail),
    }
}

/// Localized text for a request rejected at the entry point
pub fn render_error(catalog: &Catalog, error: &DownloadError) -> String {
    match error {
        DownloadError::EmptyUrl => catalog.error_no_url.to_string(),
        DownloadError::Busy => catalog.error_busy.to_string(),
        DownloadError::OutputDirMissing(path) => {
            format!("{} {}", catalog.error_output_dir, path.display())
        }
        other => format!("{} {}", catalog.error_unexpected, other),
    }
}

/// Adapts structured updates to a `(message, severity)` callback
pub struct LocalizedSink<F> {
    catalog: &'static Catalog,
    callback: F,
}

impl<F> LocalizedSink<F>
where
    F: Fn(String, Severity) + Send + Sync,
{
    pub fn new(catalog: &'static Catalog, callback: F) -> Self {
        Self { catalog, callback }
    }
}

impl<F> StatusSink for LocalizedSink<F>
where
    F: Fn(String, Severity) + Send + Sync,
{
    fn report(&self, update: StatusUpdate) {
        (self.callback)(render(self.catalog, &update.message), update.severity);
    }
}
