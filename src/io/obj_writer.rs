// Copyright @yucwang 2026

use std::fs::File;
use std::io::{ self, BufWriter, Write };
use std::path::Path;

use crate::core::mesh::Mesh;

/// Writes positions, normals when present, and 1-based triangle faces.
pub fn write_obj<W: Write>(mesh: &Mesh, out: &mut W) -> io::Result<()> {
    writeln!(out, "# meshwork export")?;
    writeln!(out, "# vertices {} triangles {}", mesh.vertex_count(), mesh.triangle_count())?;
    for p in mesh.positions() {
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }

    let normals = mesh.normals();
    if let Some(normals) = normals {
        for n in normals {
            writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
        }
    }

    for tri in mesh.triangles() {
        let [a, b, c] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
        if normals.is_some() {
            writeln!(out, "f {0}//{0} {1}//{1} {2}//{2}", a, b, c)?;
        } else {
            writeln!(out, "f {} {} {}", a, b, c)?;
        }
    }
    Ok(())
}

pub fn save_obj<P: AsRef<Path>>(mesh: &Mesh, path: P) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path.as_ref())?);
    write_obj(mesh, &mut out)?;
    out.flush()?;
    log::info!("Wrote {} triangles to {}.", mesh.triangle_count(), path.as_ref().display());
    Ok(())
}
