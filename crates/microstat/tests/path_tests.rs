use microstat::{PathMode, n_stamp_points, stamp_points, voxel_path};
use std::collections::HashSet;

const MODES: [PathMode; 3] = [PathMode::Bresenham, PathMode::Actual, PathMode::Full];

fn roi_voxels(roi: &[usize]) -> HashSet<[isize; 3]> {
    let mut half = [0_isize; 3];
    for (axis, len) in roi.iter().enumerate() {
        half[axis] = (*len as isize - 1) / 2;
    }
    let mut out = HashSet::new();
    for h in -half[0]..=half[0] {
        for i in -half[1]..=half[1] {
            for j in -half[2]..=half[2] {
                out.insert([h, i, j]);
            }
        }
    }
    out
}

#[test]
fn paths_cover_roi() {
    // the rays to the surface of the ROI visit every voxel inside it (and
    // nothing outside of it)
    for roi in [&[9][..], &[5, 5], &[7, 3], &[11, 11], &[5, 5, 5], &[3, 5, 7]] {
        let expected = roi_voxels(roi);
        let origin = vec![0_isize; roi.len()];
        for mode in MODES {
            let mut visited = HashSet::new();
            for end in stamp_points(roi).unwrap() {
                let path = voxel_path(&origin, &end[..roi.len()], mode).unwrap();
                visited.extend(path.iter().copied());
            }
            assert_eq!(visited, expected, "roi = {roi:?}, mode = {mode}");
        }
    }
}

#[test]
fn path_endpoints_and_steps() {
    let ends: [[isize; 3]; 6] = [
        [7, -3, 2],
        [-4, 4, 4],
        [0, 0, -5],
        [1, 6, -2],
        [-9, 2, 0],
        [3, 3, 1],
    ];
    let start = [2_isize, -1, 1];
    for end in ends {
        for mode in MODES {
            let path = voxel_path(&start, &end, mode).unwrap();
            let voxels = path.voxels();
            assert_eq!(voxels.first(), Some(&start));
            assert_eq!(voxels.last(), Some(&end));

            let max_disp = (0..3).map(|a| (end[a] - start[a]).abs()).max().unwrap();
            let total_disp: isize = (0..3).map(|a| (end[a] - start[a]).abs()).sum();
            match mode {
                PathMode::Bresenham => assert_eq!(voxels.len() as isize, max_disp + 1),
                PathMode::Full => assert_eq!(voxels.len() as isize, total_disp + 1),
                PathMode::Actual => {
                    assert!(voxels.len() as isize >= max_disp + 1);
                    assert!(voxels.len() as isize <= total_disp + 1);
                }
            }

            for pair in voxels.windows(2) {
                let steps: Vec<isize> = (0..3).map(|a| (pair[1][a] - pair[0][a]).abs()).collect();
                assert!(steps.iter().all(|s| *s <= 1), "{mode}: {pair:?}");
                if mode == PathMode::Full {
                    assert_eq!(steps.iter().sum::<isize>(), 1, "{pair:?}");
                }
            }
        }
    }
}

#[test]
fn stamp_points_on_surface() {
    for roi in [&[3][..], &[3, 9], &[5, 5], &[3, 3, 3], &[7, 5, 3]] {
        let points = stamp_points(roi).unwrap();
        assert_eq!(points.len(), n_stamp_points(roi).unwrap());

        let half: Vec<isize> = roi.iter().map(|len| (*len as isize - 1) / 2).collect();
        let unique: HashSet<[isize; 3]> = points.iter().copied().collect();
        assert_eq!(unique.len(), points.len(), "duplicate points for {roi:?}");
        for p in points {
            assert!((0..roi.len()).any(|axis| p[axis].abs() == half[axis]));
            assert!((0..roi.len()).all(|axis| p[axis].abs() <= half[axis]));
            assert!(p[roi.len()..].iter().all(|v| *v == 0));
        }
    }
}

#[test]
fn path_to_array() {
    let path = voxel_path(&[0, 0], &[3, 1], PathMode::Bresenham).unwrap();
    assert_eq!(path.ndim(), 2);
    let arr = path.to_array();
    assert_eq!(arr.shape(), &[path.len(), 2]);
    assert_eq!(arr.row(path.len() - 1).to_vec(), vec![3, 1]);
}
