use lightbasis::core::base::*;
use lightbasis::core::basis::*;
use lightbasis::core::imageio::*;
use lightbasis::core::options::*;
use lightbasis::core::pipeline::*;
use lightbasis::core::raster::*;

use std::path::Path;

fn near_equal(a: f64, b: f64, e: f64) -> bool {
    (a - b).abs() < e
}

const WIDTH: u32 = 64;
const HEIGHT: u32 = 32;

fn sites() -> Vec<Point2i> {
    return vec![Point2i::new(10, 16), Point2i::new(32, 8), Point2i::new(54, 24)];
}

/// Three condition images, each lit by a 3x3 patch around one site.
fn write_conditions(dir: &Path) -> Vec<Option<std::path::PathBuf>> {
    let mut paths = Vec::new();
    for (k, s) in sites().iter().enumerate() {
        let mut image = FloatImage::new(WIDTH, HEIGHT);
        for dy in -1..=1 {
            for dx in -1..=1 {
                image.set((s.x + dx) as u32, (s.y + dy) as u32, &[1.0, 1.0, 1.0]);
            }
        }
        let path = dir.join(format!("condition_{}.pfm", k));
        write_image_pfm(&path.to_string_lossy(), &image).unwrap();
        paths.push(Some(path));
    }
    return paths;
}

fn write_map(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("map.pfm");
    let map = FloatImage::constant(WIDTH, HEIGHT, &[1.0, 1.0, 1.0]);
    write_image_pfm(&path.to_string_lossy(), &map).unwrap();
    return path;
}

#[test]
fn pipeline_three_lights_weights_follow_pixel_mass() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out");
    let options = RelightOptions {
        environment_map: Some(write_map(dir.path())),
        lighting_conditions: write_conditions(dir.path()),
        number_of_offsets: 2,
        output_dir: output.clone(),
        ..RelightOptions::default()
    };
    let report = RelightingPipeline::new(options).run().unwrap();
    assert_eq!(report.partition.cell_centers(), sites());
    assert_eq!(report.results.len(), 2);

    let mut mass = vec![0.0; 3];
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let cell = report.partition.cell_at(x, y).unwrap();
            mass[cell] += solid_angle_weight(y, HEIGHT);
        }
    }
    let total: f64 = mass.iter().sum();
    for result in report.results.iter() {
        for k in 0..3 {
            for c in 0..3 {
                assert!(near_equal(result.weights[k][c], mass[k] / total, 1e-9));
            }
        }
    }

    for name in ["weights_0.txt", "weights_1.txt", "partition_0.png", "basis.txt", "grouping.txt"] {
        assert!(output.join(name).exists(), "{} missing", name);
    }
    let text = std::fs::read_to_string(output.join("weights_0.txt")).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(text.starts_with("0: "));
}

#[test]
fn pipeline_basis_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first");
    let map = write_map(dir.path());
    let options = RelightOptions {
        environment_map: Some(map.clone()),
        lighting_conditions: write_conditions(dir.path()),
        output_dir: first.clone(),
        ..RelightOptions::default()
    };
    let report = RelightingPipeline::new(options).run().unwrap();

    // loading appends after the lights already present
    let mut basis = LightingBasis::new(WIDTH, HEIGHT);
    basis.add_point_light(&Point2i::new(1, 1));
    let added = load_basis(&first.join("basis.txt").to_string_lossy(), &mut basis).unwrap();
    assert_eq!(added, vec![1, 2, 3]);
    assert_eq!(&basis.point_lights()[1..], &sites()[..]);

    let options = RelightOptions {
        environment_map: Some(map),
        identification: IdentificationMethod::BasisFile {
            basis: first.join("basis.txt"),
            grouping: first.join("grouping.txt"),
        },
        output_dir: dir.path().join("second"),
        ..RelightOptions::default()
    };
    let reloaded = RelightingPipeline::new(options).run().unwrap();
    assert_eq!(reloaded.partition.cell_centers(), report.partition.cell_centers());
    assert_eq!(
        reloaded.partition.condition_mapping(),
        report.partition.condition_mapping()
    );
    assert_eq!(reloaded.results[0].weights, report.results[0].weights);
}

#[test]
fn pipeline_masks_with_optimization_and_relighting() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out");

    // three vertical bands; black selects
    let mut mask_paths = Vec::new();
    for k in 0..3u32 {
        let mut bytes = vec![255u8; (3 * WIDTH * HEIGHT) as usize];
        for y in 0..HEIGHT {
            for x in (k * 20)..(k * 20 + 20) {
                let i = (3 * (y * WIDTH + x)) as usize;
                bytes[i..i + 3].copy_from_slice(&[0, 0, 0]);
            }
        }
        let path = dir.path().join(format!("mask_{}.png", k));
        write_image_bytes(&path.to_string_lossy(), bytes, WIDTH, HEIGHT).unwrap();
        mask_paths.push(Some(path));
    }

    let mut field_paths = Vec::new();
    for k in 0..3 {
        let path = dir.path().join(format!("field_{}.pfm", k));
        let image = FloatImage::constant(4, 4, &[(k + 1) as Float; 3]);
        write_image_pfm(&path.to_string_lossy(), &image).unwrap();
        field_paths.push(Some(path));
    }

    let options = RelightOptions {
        environment_map: Some(write_map(dir.path())),
        condition_masks: mask_paths,
        reflectance_field: field_paths,
        identification: IdentificationMethod::Masks,
        optimization: OptimizationMethod::OriginalSpace,
        number_of_offsets: 3,
        output_dir: output.clone(),
        ..RelightOptions::default()
    };
    let report = RelightingPipeline::new(options).run().unwrap();
    assert_eq!(report.partition.number_of_cells(), 0);
    assert_eq!(report.results.len(), 3);
    for result in report.results.iter() {
        let outcome = result.outcome.as_ref().unwrap();
        for x in outcome.multipliers.iter() {
            assert!(*x >= 0.0 && *x <= 10.0);
        }
        let sum: f64 = result.weights.iter().map(|w| w[0]).sum();
        assert!(near_equal(sum, 1.0, 1e-9));
    }
    assert!(output.join("relit_2.pfm").exists());
    assert!(!output.join("basis.txt").exists());
    let relit = read_image_pfm(&output.join("relit_0.pfm").to_string_lossy()).unwrap();
    let w = &report.results[0].weights;
    let expected = w[0][0] + 2.0 * w[1][0] + 3.0 * w[2][0];
    assert!(near_equal(relit.get(1, 1)[0] as f64, expected, 1e-5));
}

#[test]
fn pipeline_skips_reflectance_image_of_other_size() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out");
    let mut field_paths = Vec::new();
    for (k, width) in [4u32, 5, 4].iter().enumerate() {
        let path = dir.path().join(format!("field_{}.pfm", k));
        let image = FloatImage::constant(*width, 4, &[1.0; 3]);
        write_image_pfm(&path.to_string_lossy(), &image).unwrap();
        field_paths.push(Some(path));
    }
    let options = RelightOptions {
        environment_map: Some(write_map(dir.path())),
        lighting_conditions: write_conditions(dir.path()),
        reflectance_field: field_paths,
        output_dir: output.clone(),
        ..RelightOptions::default()
    };
    let report = RelightingPipeline::new(options).run().unwrap();
    let relit = read_image_pfm(&output.join("relit_0.pfm").to_string_lossy()).unwrap();
    assert_eq!(relit.width(), 4);
    let w = &report.results[0].weights;
    assert!(near_equal(relit.get(0, 0)[0] as f64, w[0][0] + w[2][0], 1e-5));
}

#[test]
fn pipeline_indirect_light_of_other_size_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut conditions = write_conditions(dir.path());
    let indirect = dir.path().join("indirect.pfm");
    let image = FloatImage::constant(8, 8, &[0.1; 3]);
    write_image_pfm(&indirect.to_string_lossy(), &image).unwrap();
    conditions.push(Some(indirect));
    let options = RelightOptions {
        environment_map: Some(write_map(dir.path())),
        lighting_conditions: conditions,
        remove_indirect_light: true,
        indirect_light_condition: Some(3),
        output_dir: dir.path().join("out"),
        ..RelightOptions::default()
    };
    let report = RelightingPipeline::new(options).run().unwrap();
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].weights.len(), 4);
}
