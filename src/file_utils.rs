use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cue::Cue;
use crate::parser;
use crate::renderer::HlsSegmentFile;

// @module: File and directory utilities

/// Playlist name written next to the HLS segment files
pub const PLAYLIST_FILENAME: &str = "playlist.m3u8";

/// Extensions recognised as subtitle inputs
const SUBTITLE_EXTENSIONS: [&str; 2] = ["vtt", "srt"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @checks: SRT input by extension
    pub fn is_srt<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("srt"))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read a subtitle file as WebVTT text, converting `.srt` inputs
    pub fn read_vtt_text<P: AsRef<Path>>(path: P) -> Result<String> {
        let content = Self::read_to_string(&path)?;
        if Self::is_srt(&path) || parser::looks_like_srt(&content) {
            debug!("Converting SRT input {:?}", path.as_ref());
            return Ok(parser::srt_to_vtt(&content));
        }
        Ok(content)
    }

    /// Read and parse a subtitle file
    pub fn read_subtitles<P: AsRef<Path>>(path: P) -> Result<Vec<Cue>> {
        let text = Self::read_vtt_text(&path)?;
        let cues = parser::parse_vtt(&text).with_context(|| format!("Failed to parse subtitle: {:?}", path.as_ref()))?;
        debug!("Read {} cues from {:?}", cues.len(), path.as_ref());
        Ok(cues)
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write HLS segment files and their playlist into `dir`
    pub fn write_hls_dir<P: AsRef<Path>>(dir: P, files: &[HlsSegmentFile], playlist: &str) -> Result<PathBuf> {
        let dir = dir.as_ref();
        Self::ensure_dir(dir)?;

        for file in files {
            Self::write_to_file(dir.join(&file.filename), &file.content)?;
        }

        let playlist_path = dir.join(PLAYLIST_FILENAME);
        Self::write_to_file(&playlist_path, playlist)?;
        debug!("Wrote {} segments to {:?}", files.len(), dir);
        Ok(playlist_path)
    }

    /// Find subtitle files (`.vtt`, `.srt`) under a directory
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    let ext = ext.to_string_lossy().to_lowercase();
                    if SUBTITLE_EXTENSIONS.contains(&ext.as_str()) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    // @generates: Output path next to the input, tagged with a suffix
    // @params: input_file, output_dir, suffix, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        suffix: &str,
        extension: &str,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        if !suffix.is_empty() {
            output_filename.push('.');
            output_filename.push_str(suffix);
        }
        output_filename.push('.');
        output_filename.push_str(extension);

        output_dir.as_ref().join(output_filename)
    }
}
