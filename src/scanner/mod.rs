//! 画像の受け付け
//!
//! ファイル・フォルダの指定から処理待ちの画像一覧を作り、
//! 一覧表示用のプレビュー情報を返す。

mod exif;

use crate::error::{ImageExtractError, Result};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// 受け付ける拡張子とMIMEタイプ（拡張子は小文字で比較）
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: &'static str,
}

impl ImageFile {
    /// 対応形式ならImageFileを作る
    pub fn from_path(path: &Path) -> Option<Self> {
        let mime_type = mime_type_for(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Some(Self {
            path: path.to_path_buf(),
            file_name,
            mime_type,
        })
    }
}

/// 拡張子からMIMEタイプを判定
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// 処理待ちの画像一覧。選択し直すたびに丸ごと置き換える
#[derive(Debug, Clone, Default)]
pub struct PendingSelection {
    files: Vec<ImageFile>,
}

impl PendingSelection {
    pub fn new(files: Vec<ImageFile>) -> Self {
        Self { files }
    }

    pub fn replace(&mut self, files: Vec<ImageFile>) {
        self.files = files;
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[ImageFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// フォルダ内の画像を列挙（ファイル名順）
pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<ImageFile>> {
    if !folder.is_dir() {
        return Err(ImageExtractError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut images: Vec<ImageFile> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| ImageFile::from_path(e.path()))
        .collect();

    images.sort_by(|a, b| a.file_name.cmp(&b.file_name).then_with(|| a.path.cmp(&b.path)));

    Ok(images)
}

/// ファイル・フォルダの指定から画像一覧を作る
///
/// - ファイルは指定順のまま
/// - フォルダは中身をファイル名順に展開
/// - 非対応形式のファイルは警告してスキップ
pub fn collect_images(paths: &[PathBuf], recursive: bool) -> Result<Vec<ImageFile>> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_dir() {
            images.extend(scan_folder(path, recursive)?);
        } else if path.is_file() {
            match ImageFile::from_path(path) {
                Some(image) => images.push(image),
                None => warn!("非対応の画像形式のためスキップ: {}", path.display()),
            }
        } else {
            return Err(ImageExtractError::FileNotFound(path.display().to_string()));
        }
    }

    Ok(images)
}

/// 選択画像のプレビュー情報
#[derive(Debug, Clone)]
pub struct ImagePreview {
    pub file_name: String,
    pub mime_type: &'static str,
    pub size_bytes: u64,
    /// 画像として読めない場合は `None`
    pub dimensions: Option<(u32, u32)>,
    /// EXIF撮影日時
    pub date: Option<String>,
}

pub fn preview(image: &ImageFile) -> Result<ImagePreview> {
    let size_bytes = std::fs::metadata(&image.path)
        .map_err(|e| ImageExtractError::ImageLoad(format!("{}: {}", image.file_name, e)))?
        .len();

    Ok(ImagePreview {
        file_name: image.file_name.clone(),
        mime_type: image.mime_type,
        size_bytes,
        dimensions: ::image::image_dimensions(&image.path).ok(),
        date: exif::extract_date(&image.path),
    })
}
