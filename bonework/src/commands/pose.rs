//! Pose sampling command

use anyhow::{Context, Result, bail};
use bonework_skeleton::glam::Mat4;
use bonework_skeleton::{LoadOptions, Pose, PoseData, Skeleton};
use serde::Serialize;

use crate::cli::PoseArgs;
use crate::commands::load;
use crate::utils::{add_table_row, create_table, format_matrix_rows};

/// One bone's resolved matrices, for JSON output
#[derive(Debug, Serialize)]
struct BoneReport {
    index: usize,
    name: String,
    /// Skinning matrix, column-major
    matrix: [f32; 16],
    /// Model-space transform, column-major
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<[f32; 16]>,
}

#[derive(Debug, Serialize)]
struct PoseReport {
    animation: Option<String>,
    time: f32,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    alpha: Option<f32>,
    bones: Vec<BoneReport>,
}

pub fn execute(args: &PoseArgs, options: &LoadOptions) -> Result<()> {
    let skeleton = load(&args.file, options)?;
    let report = sample(&skeleton, args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn sample(skeleton: &Skeleton, args: &PoseArgs) -> Result<PoseReport> {
    let animation = match &args.animation {
        Some(name) => match skeleton.animation_index(name) {
            Some(index) => Some(index),
            None => bail!("No animation named '{name}'"),
        },
        None => None,
    };

    let pose = Pose::sample(skeleton, animation, args.time, args.smooth)
        .context("Failed to sample pose")?;

    let (kind, alpha) = match pose.data() {
        PoseData::Bind => ("bind", None),
        PoseData::Single(_) => ("single", None),
        PoseData::Blended { alpha, .. } => ("blended", Some(*alpha)),
    };

    let bones = match &args.bone {
        Some(name) => {
            let index = skeleton
                .bone_index(name)
                .with_context(|| format!("No bone named '{name}'"))?;
            vec![BoneReport {
                index,
                name: name.clone(),
                matrix: resolved(pose.bone_world_matrix(index), index)?,
                attachment: Some(resolved(pose.bone_attachment_matrix(index), index)?),
            }]
        }
        None => pose
            .bone_matrices()
            .iter()
            .zip(skeleton.bones())
            .enumerate()
            .map(|(index, (matrix, bone))| BoneReport {
                index,
                name: bone.name.clone(),
                matrix: matrix.to_cols_array(),
                attachment: None,
            })
            .collect(),
    };

    Ok(PoseReport {
        animation: args.animation.clone(),
        time: args.time,
        kind,
        alpha,
        bones,
    })
}

fn resolved(matrix: Option<Mat4>, index: usize) -> Result<[f32; 16]> {
    matrix
        .map(|m| m.to_cols_array())
        .with_context(|| format!("Bone {index} could not be resolved"))
}

fn print_report(report: &PoseReport) {
    match &report.animation {
        Some(name) => println!("Animation: {name} at {:.3}s", report.time),
        None => println!("Bind pose"),
    }
    match report.alpha {
        Some(alpha) => println!("Pose:      {} (alpha {alpha:.3})", report.kind),
        None => println!("Pose:      {}", report.kind),
    }
    println!();

    let mut headers = vec!["#", "Bone", "Matrix"];
    let with_attachment = report.bones.iter().any(|b| b.attachment.is_some());
    if with_attachment {
        headers.push("Attachment");
    }

    let mut table = create_table(&headers);
    for bone in &report.bones {
        let mut cells = vec![
            bone.index.to_string(),
            bone.name.clone(),
            format_matrix_rows(&Mat4::from_cols_array(&bone.matrix)),
        ];
        if let Some(attachment) = &bone.attachment {
            cells.push(format_matrix_rows(&Mat4::from_cols_array(attachment)));
        }
        add_table_row(&mut table, cells);
    }
    table.printstd();
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonework_skeleton::glam::{Quat, Vec3};
    use bonework_skeleton::{ImportAnimation, ImportData, ImportJoint, Transform, load_skeleton};
    use std::path::PathBuf;

    fn skeleton() -> Skeleton {
        let joints = vec![
            ImportJoint::new("root", None),
            ImportJoint::new("tip", Some(0)).with_translation(Vec3::Y),
        ];
        let frames = vec![
            vec![Transform::IDENTITY, Transform::IDENTITY],
            vec![
                Transform::IDENTITY,
                Transform::from_rotation(Quat::from_rotation_z(1.0)),
            ],
        ];
        let animations = vec![ImportAnimation::new("Bend", 0, 2, 1.0, false)];
        load_skeleton(&ImportData::bake(joints, animations, &frames).unwrap()).unwrap()
    }

    fn args(animation: Option<&str>, bone: Option<&str>) -> PoseArgs {
        PoseArgs {
            file: PathBuf::from("unused.json"),
            animation: animation.map(str::to_string),
            time: 0.5,
            smooth: true,
            bone: bone.map(str::to_string),
            json: true,
        }
    }

    #[test]
    fn test_sample_all_bones() {
        let skeleton = skeleton();
        let report = sample(&skeleton, &args(Some("Bend"), None)).unwrap();

        assert_eq!(report.kind, "blended");
        assert_eq!(report.alpha, Some(0.5));
        assert_eq!(report.bones.len(), 2);
        assert!(report.bones.iter().all(|b| b.attachment.is_none()));
    }

    #[test]
    fn test_sample_single_bone() {
        let skeleton = skeleton();
        let report = sample(&skeleton, &args(None, Some("tip"))).unwrap();

        assert_eq!(report.kind, "bind");
        assert_eq!(report.bones.len(), 1);
        let bind = Mat4::from_translation(Vec3::Y).to_cols_array();
        assert_eq!(report.bones[0].matrix, bind);
        assert_eq!(report.bones[0].attachment, Some(bind));
    }

    #[test]
    fn test_unknown_names_fail() {
        let skeleton = skeleton();
        assert!(sample(&skeleton, &args(Some("Run"), None)).is_err());
        assert!(sample(&skeleton, &args(None, Some("foot"))).is_err());
    }
}
