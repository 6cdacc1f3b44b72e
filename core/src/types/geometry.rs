/// Homogeneous 4x4 transform matrix, row major
pub type Matrix4 = [[f64; 4]; 4];

/// Identity transform
pub const IDENTITY: Matrix4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// An invertible spatial transform carried together with its inverse
///
/// Decoders hand both directions over so that hardening never has to invert
/// a matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialTransform {
    pub matrix: Matrix4,
    pub inverse: Matrix4,
}

impl SpatialTransform {
    pub fn identity() -> Self {
        Self {
            matrix: IDENTITY,
            inverse: IDENTITY,
        }
    }
}

/// Spatial mapping of a reconstructed volume
///
/// `ijk_to_world` maps voxel indices to physical coordinates;
/// `world_to_ijk` is its inverse. Both are supplied by the decoder
/// collaborator, never re-derived here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeGeometry {
    pub ijk_to_world: Matrix4,
    pub world_to_ijk: Matrix4,

    /// Voxel spacing in millimeters (row, column, slice)
    pub spacing: (f64, f64, f64),
}

impl VolumeGeometry {
    /// Axis-aligned geometry with the given spacing
    pub fn axis_aligned(spacing: (f64, f64, f64)) -> Self {
        let (r, c, s) = spacing;
        let mut ijk_to_world = IDENTITY;
        ijk_to_world[0][0] = r;
        ijk_to_world[1][1] = c;
        ijk_to_world[2][2] = s;
        let mut world_to_ijk = IDENTITY;
        world_to_ijk[0][0] = 1.0 / r;
        world_to_ijk[1][1] = 1.0 / c;
        world_to_ijk[2][2] = 1.0 / s;
        Self {
            ijk_to_world,
            world_to_ijk,
            spacing,
        }
    }

    /// Applies a parent transform permanently into this geometry
    ///
    /// After hardening, the parent transform must be discarded; the volume
    /// is axis-aligned in its own coordinate frame again.
    pub fn harden(&mut self, parent: &SpatialTransform) {
        self.ijk_to_world = mat_mul(&parent.matrix, &self.ijk_to_world);
        self.world_to_ijk = mat_mul(&self.world_to_ijk, &parent.inverse);
    }

    /// Element-wise comparison of both matrices within `epsilon`
    pub fn approx_eq(&self, other: &VolumeGeometry, epsilon: f64) -> bool {
        mat_approx_eq(&self.ijk_to_world, &other.ijk_to_world, epsilon)
            && mat_approx_eq(&self.world_to_ijk, &other.world_to_ijk, epsilon)
    }
}

fn mat_mul(a: &Matrix4, b: &Matrix4) -> Matrix4 {
    let mut out = [[0.0; 4]; 4];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..4).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

fn mat_approx_eq(a: &Matrix4, b: &Matrix4, epsilon: f64) -> bool {
    a.iter()
        .flatten()
        .zip(b.iter().flatten())
        .all(|(x, y)| (x - y).abs() <= epsilon)
}
