//! The replay buffer.
use super::{Batch, ReplayBufferConfig};
use crate::{base::Obs, error::SacAeError, ObservationSpace};
use anyhow::{Context, Result};
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    ffi::OsStr,
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

/// On-disk representation of one contiguous range of transitions.
///
/// The layout fields let `load` reject chunks recorded with a different
/// observation or action configuration before touching the arenas.
#[derive(Serialize, Deserialize)]
struct Chunk {
    start: usize,
    end: usize,
    camera_len: usize,
    proprio_len: Option<usize>,
    action_dim: usize,
    camera: Vec<u8>,
    proprio: Option<Vec<f32>>,
    actions: Vec<f32>,
    rewards: Vec<f32>,
    next_camera: Vec<u8>,
    next_proprio: Option<Vec<f32>>,
    not_dones: Vec<f32>,
}

/// Fixed-capacity circular store of environment transitions.
///
/// Each field lives in its own preallocated arena indexed by a shared
/// write cursor. Two markers define the sampleable range: the cursor `idx`
/// and the `full` flag. Before the first wraparound the valid range is
/// `[0, idx)`; once the cursor has wrapped past the capacity and returned
/// to 0, `full` becomes true (and never reverts) and the whole ring is
/// valid. Writes unconditionally overwrite the slot at the cursor, so the
/// oldest transitions are evicted first.
///
/// There is exactly one writer (the training loop) and sampling happens
/// synchronously from the same thread during agent updates, so no locking
/// is involved. A parallel reimplementation of the loop would have to add
/// explicit synchronization around these arenas.
pub struct ReplayBuffer {
    capacity: usize,
    camera_len: usize,
    proprio_len: Option<usize>,
    action_dim: usize,

    camera: Vec<u8>,
    proprio: Option<Vec<f32>>,
    actions: Vec<f32>,
    rewards: Vec<f32>,
    next_camera: Vec<u8>,
    next_proprio: Option<Vec<f32>>,
    not_dones: Vec<f32>,

    /// Write cursor in `[0, capacity)`.
    idx: usize,

    /// Cursor position at the time of the previous `save`.
    last_save: usize,

    /// Transitions added since the previous `save`.
    since_save: usize,

    /// True once the cursor has wrapped. Monotone.
    full: bool,

    rng: StdRng,
}

impl ReplayBuffer {
    /// Creates a buffer for the given observation layout and action
    /// dimension. The proprioception arenas are allocated only if the
    /// observation space declares that component.
    pub fn new(obs_space: &ObservationSpace, action_dim: usize, config: &ReplayBufferConfig) -> Self {
        let capacity = config.capacity;
        let camera_len = obs_space.camera_len();
        let proprio_len = obs_space.proprioception;

        Self {
            capacity,
            camera_len,
            proprio_len,
            action_dim,
            camera: vec![0; capacity * camera_len],
            proprio: proprio_len.map(|d| vec![0.0; capacity * d]),
            actions: vec![0.0; capacity * action_dim],
            rewards: vec![0.0; capacity],
            next_camera: vec![0; capacity * camera_len],
            next_proprio: proprio_len.map(|d| vec![0.0; capacity * d]),
            not_dones: vec![0.0; capacity],
            idx: 0,
            last_save: 0,
            since_save: 0,
            full: false,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Number of sampleable transitions.
    pub fn len(&self) -> usize {
        if self.full {
            self.capacity
        } else {
            self.idx
        }
    }

    /// Returns if no transition has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns if the cursor has wrapped at least once.
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// The fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The current write cursor.
    pub fn cursor(&self) -> usize {
        self.idx
    }

    /// Returns if the buffer stores proprioceptive observations.
    pub fn has_proprio(&self) -> bool {
        self.proprio_len.is_some()
    }

    /// All stored rewards, indexed by slot. Only the first [`len`] slots
    /// are meaningful before the first wraparound.
    ///
    /// [`len`]: ReplayBuffer::len
    pub fn rewards(&self) -> &[f32] {
        &self.rewards
    }

    /// All stored not-done flags, indexed by slot.
    pub fn not_dones(&self) -> &[f32] {
        &self.not_dones
    }

    /// The camera observation stored at a slot.
    pub fn camera_at(&self, i: usize) -> &[u8] {
        &self.camera[i * self.camera_len..(i + 1) * self.camera_len]
    }

    /// The action stored at a slot.
    pub fn action_at(&self, i: usize) -> &[f32] {
        &self.actions[i * self.action_dim..(i + 1) * self.action_dim]
    }

    /// Stores one transition at the write cursor and advances it.
    ///
    /// All fields are value-copied; the caller is free to reuse its
    /// observation buffers afterwards. `done` must already be
    /// horizon-corrected (see the trainer's bootstrap rule); it is stored
    /// inverted as a not-done flag.
    pub fn add(&mut self, obs: &Obs, action: &[f32], reward: f32, next_obs: &Obs, done: bool) {
        assert_eq!(obs.camera.len(), self.camera_len);
        assert_eq!(next_obs.camera.len(), self.camera_len);
        assert_eq!(action.len(), self.action_dim);
        assert_eq!(obs.proprio.is_some(), self.proprio_len.is_some());

        let i = self.idx;
        let c = self.camera_len;
        self.camera[i * c..(i + 1) * c].copy_from_slice(&obs.camera);
        self.next_camera[i * c..(i + 1) * c].copy_from_slice(&next_obs.camera);

        if let Some(d) = self.proprio_len {
            let dst = self.proprio.as_mut().expect("proprio arena allocated");
            dst[i * d..(i + 1) * d].copy_from_slice(obs.proprio.as_ref().unwrap());
            let dst = self.next_proprio.as_mut().expect("proprio arena allocated");
            dst[i * d..(i + 1) * d].copy_from_slice(next_obs.proprio.as_ref().unwrap());
        }

        let a = self.action_dim;
        self.actions[i * a..(i + 1) * a].copy_from_slice(action);
        self.rewards[i] = reward;
        self.not_dones[i] = if done { 0.0 } else { 1.0 };

        self.idx = (self.idx + 1) % self.capacity;
        self.since_save += 1;
        self.full = self.full || self.idx == 0;
    }

    /// Draws `batch_size` transitions uniformly at random, with
    /// replacement, from the valid range.
    ///
    /// Camera pixels are converted to `f32`; other fields keep their
    /// stored type. Sampling from an empty buffer is a programming error
    /// (the loop always waits for the warm-up period first) and aborts.
    pub fn sample(&mut self, batch_size: usize) -> Batch {
        let len = self.len();
        assert!(len > 0, "sampling from an empty replay buffer");

        let ixs: Vec<usize> = (0..batch_size).map(|_| self.rng.gen_range(0..len)).collect();

        Batch {
            obs_camera: gather_u8_as_f32(&self.camera, self.camera_len, &ixs),
            obs_proprio: self
                .proprio
                .as_ref()
                .map(|p| gather_f32(p, self.proprio_len.unwrap(), &ixs)),
            actions: gather_f32(&self.actions, self.action_dim, &ixs),
            rewards: ixs.iter().map(|&i| self.rewards[i]).collect(),
            next_camera: gather_u8_as_f32(&self.next_camera, self.camera_len, &ixs),
            next_proprio: self
                .next_proprio
                .as_ref()
                .map(|p| gather_f32(p, self.proprio_len.unwrap(), &ixs)),
            not_dones: ixs.iter().map(|&i| self.not_dones[i]).collect(),
        }
    }

    /// Persists the transitions added since the previous save.
    ///
    /// One chunk file named `{start}_{end}.bincode` covers the range
    /// `[last_save, idx)`. No-op when nothing new was added. If the cursor
    /// wrapped past 0 since the previous save, the unsaved range is no
    /// longer one contiguous slice and [`load`]'s strict ascending-start
    /// replay could not reconstruct it; this fails with
    /// [`SacAeError::SaveSpansWrap`] instead of mis-saving. The check
    /// compares the insertion count since the previous save against the
    /// cursor distance, so it also catches a cursor that lapped the whole
    /// ring and passed the save point. Callers that save at least once per
    /// capacity lap never hit this.
    ///
    /// [`load`]: ReplayBuffer::load
    pub fn save(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        if self.since_save == 0 {
            return Ok(());
        }
        // A cursor sitting exactly at 0 after a wrap still leaves one
        // contiguous unsaved slice, ending at the capacity.
        let end = if self.idx == 0 { self.capacity } else { self.idx };
        if end < self.last_save || self.since_save != end - self.last_save {
            return Err(SacAeError::SaveSpansWrap {
                last_save: self.last_save,
                idx: self.idx,
            }
            .into());
        }
        crate::util::make_dir(dir)?;
        self.write_chunk(dir, self.last_save, end)?;
        self.last_save = self.idx;
        self.since_save = 0;

        Ok(())
    }

    /// Restores buffer contents from chunk files written by [`save`].
    ///
    /// Chunks are replayed in ascending start order; each chunk must start
    /// exactly at the current write cursor, so gaps and overlaps fail with
    /// a typed error instead of silently corrupting the ring.
    ///
    /// [`save`]: ReplayBuffer::save
    pub fn load(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        let mut chunks: Vec<(usize, PathBuf)> = Vec::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(OsStr::to_str) != Some("bincode") {
                continue;
            }
            let start = chunk_start(&path)?;
            chunks.push((start, path));
        }
        chunks.sort_by_key(|(start, _)| *start);

        for (_, path) in chunks.iter() {
            let file = File::open(path).with_context(|| format!("opening {:?}", path))?;
            let chunk: Chunk = bincode::deserialize_from(BufReader::new(file))
                .with_context(|| format!("decoding {:?}", path))?;
            self.apply_chunk(chunk)?;
        }
        info!(
            "Loaded {} chunk(s); buffer holds {} transition(s)",
            chunks.len(),
            self.len()
        );

        Ok(())
    }

    fn write_chunk(&self, dir: &Path, start: usize, end: usize) -> Result<()> {
        let chunk = Chunk {
            start,
            end,
            camera_len: self.camera_len,
            proprio_len: self.proprio_len,
            action_dim: self.action_dim,
            camera: self.camera[start * self.camera_len..end * self.camera_len].to_vec(),
            proprio: self
                .proprio
                .as_ref()
                .map(|p| p[start * self.proprio_len.unwrap()..end * self.proprio_len.unwrap()].to_vec()),
            actions: self.actions[start * self.action_dim..end * self.action_dim].to_vec(),
            rewards: self.rewards[start..end].to_vec(),
            next_camera: self.next_camera[start * self.camera_len..end * self.camera_len].to_vec(),
            next_proprio: self
                .next_proprio
                .as_ref()
                .map(|p| p[start * self.proprio_len.unwrap()..end * self.proprio_len.unwrap()].to_vec()),
            not_dones: self.not_dones[start..end].to_vec(),
        };

        let path = dir.join(format!("{}_{}.bincode", start, end));
        let file = File::create(&path).with_context(|| format!("creating {:?}", path))?;
        bincode::serialize_into(BufWriter::new(file), &chunk)
            .with_context(|| format!("encoding {:?}", path))?;
        info!("Saved buffer chunk [{}, {}) to {:?}", start, end, path);

        Ok(())
    }

    fn apply_chunk(&mut self, chunk: Chunk) -> Result<()> {
        let (start, end) = (chunk.start, chunk.end);
        if start != self.idx {
            return Err(SacAeError::ChunkGap {
                expected: self.idx,
                found: start,
            }
            .into());
        }
        if start >= end || end > self.capacity {
            return Err(SacAeError::ChunkOutOfRange {
                start,
                end,
                capacity: self.capacity,
            }
            .into());
        }
        if chunk.camera_len != self.camera_len
            || chunk.proprio_len != self.proprio_len
            || chunk.action_dim != self.action_dim
        {
            return Err(SacAeError::ChunkLayout(format!(
                "camera_len {} / proprio_len {:?} / action_dim {}",
                chunk.camera_len, chunk.proprio_len, chunk.action_dim
            ))
            .into());
        }
        let rows = end - start;
        if chunk.camera.len() != rows * self.camera_len || chunk.rewards.len() != rows {
            return Err(SacAeError::ChunkLayout("truncated chunk payload".to_string()).into());
        }

        let c = self.camera_len;
        self.camera[start * c..end * c].copy_from_slice(&chunk.camera);
        self.next_camera[start * c..end * c].copy_from_slice(&chunk.next_camera);
        if let Some(d) = self.proprio_len {
            let src = chunk
                .proprio
                .ok_or_else(|| SacAeError::ChunkLayout("missing proprio payload".to_string()))?;
            self.proprio.as_mut().unwrap()[start * d..end * d].copy_from_slice(&src);
            let src = chunk
                .next_proprio
                .ok_or_else(|| SacAeError::ChunkLayout("missing proprio payload".to_string()))?;
            self.next_proprio.as_mut().unwrap()[start * d..end * d].copy_from_slice(&src);
        }
        let a = self.action_dim;
        self.actions[start * a..end * a].copy_from_slice(&chunk.actions);
        self.rewards[start..end].copy_from_slice(&chunk.rewards);
        self.not_dones[start..end].copy_from_slice(&chunk.not_dones);

        self.idx = end % self.capacity;
        self.full = self.full || end == self.capacity;
        self.last_save = self.idx;
        self.since_save = 0;

        Ok(())
    }
}

/// Parses the start index out of a `{start}_{end}.bincode` file name.
fn chunk_start(path: &Path) -> Result<usize> {
    let name = || format!("{:?}", path);
    let stem = path
        .file_stem()
        .and_then(OsStr::to_str)
        .ok_or_else(|| SacAeError::ChunkFileName(name()))?;
    let start = stem
        .split('_')
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| SacAeError::ChunkFileName(name()))?;
    Ok(start)
}

fn gather_f32(arena: &[f32], dim: usize, ixs: &[usize]) -> Vec<f32> {
    let mut out = Vec::with_capacity(ixs.len() * dim);
    for &i in ixs {
        out.extend_from_slice(&arena[i * dim..(i + 1) * dim]);
    }
    out
}

fn gather_u8_as_f32(arena: &[u8], dim: usize, ixs: &[usize]) -> Vec<f32> {
    let mut out = Vec::with_capacity(ixs.len() * dim);
    for &i in ixs {
        out.extend(arena[i * dim..(i + 1) * dim].iter().map(|&v| v as f32));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Obs;
    use tempdir::TempDir;

    fn space(proprio: bool) -> ObservationSpace {
        ObservationSpace {
            camera: [3, 4, 4],
            proprioception: if proprio { Some(2) } else { None },
        }
    }

    fn buffer(capacity: usize, proprio: bool) -> ReplayBuffer {
        let config = ReplayBufferConfig::default().capacity(capacity).seed(0);
        ReplayBuffer::new(&space(proprio), 2, &config)
    }

    fn obs(t: usize, proprio: bool) -> Obs {
        Obs {
            camera: vec![(t % 256) as u8; 48],
            proprio: if proprio {
                Some(vec![t as f32, -(t as f32)])
            } else {
                None
            },
        }
    }

    fn add_step(buf: &mut ReplayBuffer, t: usize, done: bool) {
        let proprio = buf.has_proprio();
        let action = [t as f32, 0.5];
        buf.add(&obs(t, proprio), &action, t as f32, &obs(t + 1, proprio), done);
    }

    #[test]
    fn full_flag_and_len_track_insertions() {
        let mut buf = buffer(8, false);
        for t in 0..5 {
            add_step(&mut buf, t, false);
        }
        assert!(!buf.is_full());
        assert_eq!(buf.len(), 5);

        for t in 5..8 {
            add_step(&mut buf, t, false);
        }
        assert!(buf.is_full());
        assert_eq!(buf.len(), 8);
        assert_eq!(buf.cursor(), 0);

        add_step(&mut buf, 8, false);
        assert!(buf.is_full());
        assert_eq!(buf.len(), 8);
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn ring_overwrites_oldest_first() {
        let mut buf = buffer(4, false);
        for t in 0..6 {
            add_step(&mut buf, t, false);
        }
        // Slots 0 and 1 were overwritten by the writes at global steps 4
        // and 5; slots 2 and 3 still hold the originals.
        assert_eq!(buf.rewards(), &[4.0, 5.0, 2.0, 3.0]);
        assert_eq!(buf.camera_at(0), &[4u8; 48][..]);
        assert_eq!(buf.camera_at(2), &[2u8; 48][..]);
    }

    #[test]
    fn sampling_is_roughly_uniform_over_the_full_ring() {
        let capacity = 16;
        let mut buf = buffer(capacity, false);
        for t in 0..capacity {
            add_step(&mut buf, t, false);
        }
        assert!(buf.is_full());

        let n = 10_000;
        let batch = buf.sample(n);
        assert_eq!(batch.len(), n);

        // Rewards encode the slot index, so they double as sampled indices.
        let mut counts = vec![0usize; capacity];
        for r in batch.rewards.iter() {
            let i = *r as usize;
            assert!(i < capacity, "sampled index out of valid range");
            counts[i] += 1;
        }
        // Expectation is n / capacity = 625; allow a generous band.
        for (i, &c) in counts.iter().enumerate() {
            assert!(
                c > 400 && c < 850,
                "slot {} sampled {} times, far from uniform",
                i,
                c
            );
        }
    }

    #[test]
    fn sampling_never_reads_beyond_the_cursor() {
        let mut buf = buffer(64, false);
        for t in 0..3 {
            add_step(&mut buf, t, false);
        }
        let batch = buf.sample(1000);
        for r in batch.rewards.iter() {
            assert!((*r as usize) < 3);
        }
    }

    #[test]
    #[should_panic(expected = "empty replay buffer")]
    fn sampling_empty_buffer_panics() {
        let mut buf = buffer(8, false);
        let _ = buf.sample(1);
    }

    #[test]
    fn not_done_flag_is_inverted_done() {
        let mut buf = buffer(4, false);
        add_step(&mut buf, 0, false);
        add_step(&mut buf, 1, true);
        assert_eq!(buf.not_dones()[0], 1.0);
        assert_eq!(buf.not_dones()[1], 0.0);
    }

    #[test]
    fn proprio_arenas_absent_without_component() {
        let mut buf = buffer(4, false);
        assert!(!buf.has_proprio());
        add_step(&mut buf, 0, false);
        let batch = buf.sample(2);
        assert!(batch.obs_proprio.is_none());
        assert!(batch.next_proprio.is_none());
    }

    #[test]
    fn proprio_round_trips_through_sampling() {
        let mut buf = buffer(4, true);
        add_step(&mut buf, 7, false);
        let batch = buf.sample(3);
        assert_eq!(batch.obs_proprio.as_ref().unwrap().len(), 3 * 2);
        assert_eq!(&batch.obs_proprio.unwrap()[0..2], &[7.0, -7.0]);
        assert_eq!(&batch.next_proprio.unwrap()[0..2], &[8.0, -8.0]);
    }

    #[test]
    fn camera_pixels_become_floats_in_batches() {
        let mut buf = buffer(4, false);
        add_step(&mut buf, 200, false);
        let batch = buf.sample(1);
        assert_eq!(batch.obs_camera[0], 200.0);
        assert_eq!(batch.next_camera[0], 201.0);
    }

    #[test]
    fn save_load_round_trip() -> Result<()> {
        let dir = TempDir::new("replay_buffer")?;
        let mut src = buffer(8, true);
        for t in 0..5 {
            add_step(&mut src, t, t == 4);
        }
        src.save(dir.path())?;

        let mut dst = buffer(8, true);
        dst.load(dir.path())?;
        assert_eq!(dst.len(), 5);
        assert_eq!(dst.cursor(), 5);
        for i in 0..5 {
            assert_eq!(dst.camera_at(i), src.camera_at(i));
            assert_eq!(dst.action_at(i), src.action_at(i));
        }
        assert_eq!(&dst.rewards()[0..5], &src.rewards()[0..5]);
        assert_eq!(&dst.not_dones()[0..5], &src.not_dones()[0..5]);
        Ok(())
    }

    #[test]
    fn incremental_saves_produce_contiguous_chunks() -> Result<()> {
        let dir = TempDir::new("replay_buffer")?;
        let mut src = buffer(8, false);
        for t in 0..3 {
            add_step(&mut src, t, false);
        }
        src.save(dir.path())?;
        // Nothing new: second save must not write another chunk.
        src.save(dir.path())?;
        for t in 3..5 {
            add_step(&mut src, t, false);
        }
        src.save(dir.path())?;

        let mut names: Vec<String> = std::fs::read_dir(dir.path())?
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["0_3.bincode", "3_5.bincode"]);

        let mut dst = buffer(8, false);
        dst.load(dir.path())?;
        assert_eq!(dst.len(), 5);
        assert_eq!(&dst.rewards()[0..5], &[0.0, 1.0, 2.0, 3.0, 4.0]);
        Ok(())
    }

    #[test]
    fn save_across_wraparound_is_refused() -> Result<()> {
        let dir = TempDir::new("replay_buffer")?;
        let mut src = buffer(4, false);
        for t in 0..3 {
            add_step(&mut src, t, false);
        }
        src.save(dir.path())?;
        // Cursor: 3 -> 0 (wrap) -> 1 -> 2, straddling index 0.
        for t in 3..6 {
            add_step(&mut src, t, false);
        }
        let err = src.save(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SacAeError>(),
            Some(SacAeError::SaveSpansWrap { last_save: 3, idx: 2 })
        ));

        // The directory still holds only the pre-wrap chunk and loads.
        let mut dst = buffer(4, false);
        dst.load(dir.path())?;
        assert_eq!(dst.len(), 3);
        assert_eq!(&dst.rewards()[0..3], &[0.0, 1.0, 2.0]);
        Ok(())
    }

    #[test]
    fn save_after_lapping_the_save_point_is_refused() -> Result<()> {
        let dir = TempDir::new("replay_buffer")?;
        let mut src = buffer(4, false);
        add_step(&mut src, 0, false);
        src.save(dir.path())?;
        // A whole lap plus one: the cursor (2) ends up past the save
        // point (1) again, but [1, 2) holds only the newest of the five
        // unsaved transitions.
        for t in 1..6 {
            add_step(&mut src, t, false);
        }
        let err = src.save(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SacAeError>(),
            Some(SacAeError::SaveSpansWrap { last_save: 1, idx: 2 })
        ));

        let mut dst = buffer(4, false);
        dst.load(dir.path())?;
        assert_eq!(dst.len(), 1);
        assert_eq!(dst.rewards()[0], 0.0);
        Ok(())
    }

    #[test]
    fn saving_a_full_ring_reloads_completely() -> Result<()> {
        let dir = TempDir::new("replay_buffer")?;
        let mut src = buffer(4, false);
        for t in 0..2 {
            add_step(&mut src, t, false);
        }
        src.save(dir.path())?;
        for t in 2..4 {
            add_step(&mut src, t, false);
        }
        // Cursor wrapped exactly to 0; the chunk ends at the capacity.
        src.save(dir.path())?;

        let mut dst = buffer(4, false);
        dst.load(dir.path())?;
        assert!(dst.is_full());
        assert_eq!(dst.cursor(), 0);
        assert_eq!(dst.rewards(), src.rewards());
        Ok(())
    }

    #[test]
    fn loading_non_contiguous_chunks_fails() -> Result<()> {
        let dir = TempDir::new("replay_buffer")?;
        let mut src = buffer(8, false);
        for t in 0..3 {
            add_step(&mut src, t, false);
        }
        src.save(dir.path())?;

        let mut dst = buffer(8, false);
        dst.load(dir.path())?;
        // Replaying the same chunk again overlaps: cursor is at 3, chunk
        // starts at 0.
        let err = dst.load(dir.path()).unwrap_err();
        match err.downcast_ref::<SacAeError>() {
            Some(SacAeError::ChunkGap { expected, found }) => {
                assert_eq!(*expected, 3);
                assert_eq!(*found, 0);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn loading_chunks_with_other_layout_fails() -> Result<()> {
        let dir = TempDir::new("replay_buffer")?;
        let mut src = buffer(8, true);
        add_step(&mut src, 0, false);
        src.save(dir.path())?;

        let mut dst = buffer(8, false);
        let err = dst.load(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SacAeError>(),
            Some(SacAeError::ChunkLayout(_))
        ));
        Ok(())
    }
}
