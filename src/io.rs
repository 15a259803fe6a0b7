//! Export of grid fields as VTK image data.
use crate::grid::StructuredGrid2d;
use crate::problem::FveModel;
use crate::Real;
use eyre::eyre;
use nalgebra::DMatrix;
use std::path::Path;
use vtkio::model::{
    Attribute, Attributes, ByteOrder, DataArray, DataSet, ElementType, Extent, ImageDataPiece, Piece, Version, Vtk,
};

/// The file name `{prefix}_{mx}x{my}.vtk` used when dumping the final state.
pub fn dump_filename(prefix: &str, mx: usize, my: usize) -> String {
    format!("{}_{}x{}.vtk", prefix, mx, my)
}

fn to_f32<T: Real>(value: T) -> f32 {
    nalgebra::try_convert::<T, f64>(value).unwrap_or(f64::NAN) as f32
}

/// Writes named global `my x mx` node arrays as point data on the image-data grid.
pub fn export_fields<T: Real>(
    grid: &StructuredGrid2d<T>,
    fields: &[(&str, &DMatrix<T>)],
    path: impl AsRef<Path>,
) -> eyre::Result<()> {
    let (mx, my) = (grid.mx(), grid.my());
    let mut point_data = Vec::with_capacity(fields.len());
    for (name, values) in fields {
        if values.shape() != (my, mx) {
            return Err(eyre!(
                "field \"{}\" has shape {:?}, expected ({}, {})",
                name,
                values.shape(),
                my,
                mx
            ));
        }
        // VTK expects x to vary fastest
        let data: Vec<f64> = (0..my)
            .flat_map(|k| (0..mx).map(move |j| (j, k)))
            .map(|(j, k)| nalgebra::try_convert::<T, f64>(values[(k, j)]).unwrap_or(f64::NAN))
            .collect();
        point_data.push(Attribute::DataArray(DataArray {
            name: name.to_string(),
            elem: ElementType::Scalars {
                num_comp: 1,
                lookup_table: None,
            },
            data: data.into(),
        }));
    }

    let extent = Extent::Dims([mx as u32, my as u32, 1]);
    let piece = ImageDataPiece {
        extent: extent.clone(),
        data: Attributes {
            point: point_data,
            cell: Vec::new(),
        },
    };
    let dataset = DataSet::ImageData {
        extent,
        origin: [to_f32(grid.min().x), to_f32(grid.min().y), 0.0],
        spacing: [to_f32(grid.dx()), to_f32(grid.dy()), 1.0],
        meta: None,
        pieces: vec![Piece::Inline(Box::new(piece))],
    };

    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let title = path
        .file_stem()
        .map(|os_str| os_str.to_string_lossy().to_string())
        .unwrap_or_else(|| "untitled".to_string());
    Vtk {
        version: Version { major: 4, minor: 1 },
        title,
        byte_order: ByteOrder::BigEndian,
        data: dataset,
        file_path: None,
    }
    .export(path)?;
    Ok(())
}

impl<T: Real> FveModel<T> {
    /// Writes the bed `b` and the solution `u` of a final state.
    pub fn dump_state(&self, u: &DMatrix<T>, path: impl AsRef<Path>) -> eyre::Result<()> {
        let b = self.bed_array();
        export_fields(self.grid(), &[("b", &b), ("u", u)], path)
    }
}
