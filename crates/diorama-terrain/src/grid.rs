//! Height-grid baking across worker threads.
//!
//! Rows are split into bands and handed to scoped workers over a
//! `crossbeam-channel` queue; finished bands come back on a second channel
//! and are stitched in row order. Height queries are pure, so the parallel
//! bake is bit-identical to [`HeightGrid::bake_serial`].

use std::ops::Range;

use crossbeam_channel::unbounded;
use glam::DVec2;

use crate::params::WorldParams;
use crate::seed::hash_heights;
use crate::world::WorldGenerator;

/// Errors from grid validation and baking.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("grid resolution must be at least 2, got {0}")]
    InvalidResolution(usize),
    #[error("grid extent must be finite and positive, got {0}")]
    InvalidExtent(f64),
    #[error("failed to spawn grid worker: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("grid bake incomplete: received {received} of {expected} rows")]
    Incomplete { expected: usize, received: usize },
}

/// Square sample lattice covering `[-extent, extent]` on both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    /// Samples per side.
    pub resolution: usize,
    /// Half the side length, in world units.
    pub extent: f64,
}

impl GridSpec {
    pub fn new(resolution: usize, extent: f64) -> Result<Self, GridError> {
        if resolution < 2 {
            return Err(GridError::InvalidResolution(resolution));
        }
        if !extent.is_finite() || extent <= 0.0 {
            return Err(GridError::InvalidExtent(extent));
        }
        Ok(Self { resolution, extent })
    }

    /// One vertex per mesh cell corner over the whole world.
    pub fn for_world(params: &WorldParams) -> Self {
        Self {
            resolution: params.mesh_resolution.max(1) + 1,
            extent: params.half_extent,
        }
    }

    /// Distance between neighbouring samples.
    pub fn spacing(&self) -> f64 {
        2.0 * self.extent / (self.resolution - 1) as f64
    }

    /// World coordinate of sample index `i` along either axis.
    pub fn coord(&self, i: usize) -> f64 {
        -self.extent + i as f64 * self.spacing()
    }

    pub fn sample_count(&self) -> usize {
        self.resolution * self.resolution
    }
}

/// Row-major heights (`iz` major, `ix` minor) for a [`GridSpec`].
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid {
    spec: GridSpec,
    heights: Vec<f64>,
}

impl HeightGrid {
    /// Bake on `threads` workers; `0` means one per CPU.
    pub fn bake(world: &WorldGenerator, spec: GridSpec, threads: usize) -> Result<Self, GridError> {
        let spec = GridSpec::new(spec.resolution, spec.extent)?;
        let threads = if threads == 0 { num_cpus::get() } else { threads };
        let threads = threads.clamp(1, spec.resolution);
        let band = (spec.resolution / (threads * 4)).max(1);

        let start = std::time::Instant::now();
        let heights = std::thread::scope(|scope| -> Result<Vec<f64>, GridError> {
            let (job_tx, job_rx) = unbounded::<Range<usize>>();
            let (row_tx, row_rx) = unbounded::<(Range<usize>, Vec<f64>)>();

            for index in 0..threads {
                let job_rx = job_rx.clone();
                let row_tx = row_tx.clone();
                std::thread::Builder::new()
                    .name(format!("grid-bake-{index}"))
                    .spawn_scoped(scope, move || {
                        while let Ok(rows) = job_rx.recv() {
                            let values = bake_rows(world, &spec, rows.clone());
                            if row_tx.send((rows, values)).is_err() {
                                break;
                            }
                        }
                    })?;
            }
            drop(row_tx);

            let mut row = 0;
            while row < spec.resolution {
                let end = (row + band).min(spec.resolution);
                if job_tx.send(row..end).is_err() {
                    break;
                }
                row = end;
            }
            drop(job_tx);

            let mut heights = vec![0.0; spec.sample_count()];
            let mut received = 0;
            for (rows, values) in row_rx {
                let offset = rows.start * spec.resolution;
                heights[offset..offset + values.len()].copy_from_slice(&values);
                received += rows.len();
            }

            if received != spec.resolution {
                return Err(GridError::Incomplete {
                    expected: spec.resolution,
                    received,
                });
            }
            Ok(heights)
        })?;

        tracing::debug!(
            resolution = spec.resolution,
            threads,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "baked height grid"
        );
        Ok(Self { spec, heights })
    }

    /// Bake on the calling thread.
    pub fn bake_serial(world: &WorldGenerator, spec: GridSpec) -> Result<Self, GridError> {
        let spec = GridSpec::new(spec.resolution, spec.extent)?;
        let heights = bake_rows(world, &spec, 0..spec.resolution);
        Ok(Self { spec, heights })
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn resolution(&self) -> usize {
        self.spec.resolution
    }

    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Height at sample `(ix, iz)`, or `None` outside the grid.
    pub fn get(&self, ix: usize, iz: usize) -> Option<f64> {
        let n = self.spec.resolution;
        (ix < n && iz < n).then(|| self.heights[iz * n + ix])
    }

    /// World `(x, z)` of sample `(ix, iz)`.
    pub fn world_pos(&self, ix: usize, iz: usize) -> DVec2 {
        DVec2::new(self.spec.coord(ix), self.spec.coord(iz))
    }

    /// Lowest and highest baked height.
    pub fn min_max(&self) -> (f64, f64) {
        self.heights
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)))
    }

    /// Order-sensitive hash of every height's bit pattern.
    pub fn digest(&self) -> u64 {
        hash_heights(&self.heights)
    }
}

fn bake_rows(world: &WorldGenerator, spec: &GridSpec, rows: Range<usize>) -> Vec<f64> {
    let mut out = Vec::with_capacity(rows.len() * spec.resolution);
    for iz in rows {
        let z = spec.coord(iz);
        out.extend((0..spec.resolution).map(|ix| world.height(spec.coord(ix), z)));
    }
    out
}
