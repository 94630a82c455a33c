use std::{
    io::{Read, Write},
    path::PathBuf,
};

use flate2::{Compression, read::ZlibDecoder, write::ZlibEncoder};

use crate::{
    config,
    error::{Result, WayfinderError},
    types::VizTrack,
};

/// zlib compressed JSON snapshot of the aggregated library.
pub struct LibrarySnapshotManager {
    path: PathBuf,
    tracks: Vec<VizTrack>,
}

impl LibrarySnapshotManager {
    pub fn new(tracks: Vec<VizTrack>) -> Self {
        Self::with_path(Self::default_path(), tracks)
    }

    pub fn with_path(path: PathBuf, tracks: Vec<VizTrack>) -> Self {
        Self { path, tracks }
    }

    pub async fn load() -> Result<Self> {
        Self::load_from(Self::default_path()).await
    }

    pub async fn load_from(path: PathBuf) -> Result<Self> {
        let bytes = async_fs::read(&path).await?;
        let tracks = decode(&bytes)?;
        Ok(Self { path, tracks })
    }

    pub async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        let bytes = encode(&self.tracks)?;
        async_fs::write(&self.path, bytes).await?;
        log::debug!(
            "wrote {} tracks to {}",
            self.tracks.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn tracks(&self) -> &[VizTrack] {
        &self.tracks
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// `<data_local_dir>/wayfinder/cache/library.json.z`
    pub fn default_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/library.json.z");
        path
    }
}

fn encode(tracks: &[VizTrack]) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(tracks)?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    Ok(encoder.finish()?)
}

fn decode(bytes: &[u8]) -> Result<Vec<VizTrack>> {
    let mut json = Vec::new();
    ZlibDecoder::new(bytes)
        .read_to_end(&mut json)
        .map_err(|e| WayfinderError::Storage(format!("corrupt library snapshot: {e}")))?;
    Ok(serde_json::from_slice(&json)?)
}
