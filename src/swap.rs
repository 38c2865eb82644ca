use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// One unit of work for the pool: a ready-to-run transcoder invocation plus
/// the source path it was built from, kept for reporting.
#[derive(Debug)]
pub struct SwapJob {
    pub input: PathBuf,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("mp4 file already exists")]
    DestinationExists,
    #[error("{0}")]
    Execution(String),
}

#[derive(Debug)]
pub struct SwapResult {
    pub input: PathBuf,
    pub outcome: Result<(), SwapError>,
}

/// Remux an mkv container into a sibling mp4 without re-encoding the streams.
///
/// No -y here: an existing destination must fail on the tool's overwrite
/// prompt so the pool can classify it.
pub fn mp4_command(bin: &Path, input: &Path) -> SwapJob {
    let mut command = Command::new(bin);
    command
        .arg("-i")
        .arg(input)
        .arg("-vcodec")
        .arg("copy")
        .arg("-acodec")
        .arg("copy")
        .arg(input.with_extension("mp4"));

    SwapJob {
        input: input.to_path_buf(),
        command,
    }
}

/// Transcode an m4a audio file into a sibling mp3.
pub fn mp3_command(bin: &Path, input: &Path) -> SwapJob {
    let mut command = Command::new(bin);
    command
        .arg("-i")
        .arg(input)
        .arg("-acodec")
        .arg("libmp3lame")
        .arg("-ab")
        .arg("256k")
        .arg(input.with_extension("mp3"));

    SwapJob {
        input: input.to_path_buf(),
        command,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn args_of(job: &SwapJob) -> Vec<String> {
        job.command
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn mp4_command_stream_copies_into_sibling_mp4() {
        let job = mp4_command(Path::new("/usr/bin/ffmpeg"), Path::new("/videos/show.mkv"));

        assert_eq!(job.command.get_program(), OsStr::new("/usr/bin/ffmpeg"));
        assert_eq!(job.input, Path::new("/videos/show.mkv"));
        assert_eq!(
            args_of(&job),
            [
                "-i",
                "/videos/show.mkv",
                "-vcodec",
                "copy",
                "-acodec",
                "copy",
                "/videos/show.mp4",
            ]
        );
    }

    #[test]
    fn mp3_command_transcodes_into_sibling_mp3() {
        let job = mp3_command(Path::new("/usr/bin/ffmpeg"), Path::new("/music/track.m4a"));

        assert_eq!(job.input, Path::new("/music/track.m4a"));
        assert_eq!(
            args_of(&job),
            [
                "-i",
                "/music/track.m4a",
                "-acodec",
                "libmp3lame",
                "-ab",
                "256k",
                "/music/track.mp3",
            ]
        );
    }

    #[test]
    fn overwriting_is_left_to_the_tool_prompt() {
        let video = mp4_command(Path::new("ffmpeg"), Path::new("a.mkv"));
        let audio = mp3_command(Path::new("ffmpeg"), Path::new("b.m4a"));

        assert!(!args_of(&video).iter().any(|a| a == "-y"));
        assert!(!args_of(&audio).iter().any(|a| a == "-y"));
    }

    #[test]
    fn error_display_texts() {
        assert_eq!(
            SwapError::DestinationExists.to_string(),
            "mp4 file already exists"
        );
        assert_eq!(
            SwapError::Execution("Unknown encoder libfoo".to_string()).to_string(),
            "Unknown encoder libfoo"
        );
    }
}
