//! Skeleton inspection commands

use anyhow::Result;
use bonework_skeleton::{LoadOptions, Skeleton};
use std::path::Path;

use crate::commands::load;
use crate::utils::{
    NodeType, TreeNode, TreeOptions, add_table_row, create_table, render_tree, yes_no,
};

pub fn info(file: &Path, options: &LoadOptions) -> Result<()> {
    let skeleton = load(file, options)?;

    println!("Skeleton: {}", file.display());
    println!("{}", "=".repeat(50));
    println!("Bones:       {}", skeleton.bone_count());
    println!(
        "Roots:       {}",
        skeleton.bones().iter().filter(|b| b.is_root()).count()
    );
    println!("Animations:  {}", skeleton.animations().len());
    println!("Frames:      {}", skeleton.frame_count());
    if skeleton.is_bind_only() {
        println!("Bind pose only, no baked frames");
    }

    if !skeleton.animations().is_empty() {
        println!();
        let mut table = create_table(&["#", "Name", "Frames", "Range", "FPS", "Duration", "Loop"]);
        for (index, anim) in skeleton.animations().iter().enumerate() {
            add_table_row(
                &mut table,
                vec![
                    index.to_string(),
                    anim.name.clone(),
                    anim.num_frames.to_string(),
                    format!(
                        "{}..{}",
                        anim.first_frame,
                        anim.first_frame.saturating_add(anim.num_frames)
                    ),
                    format!("{:.1}", anim.framerate),
                    format!("{:.2}s", anim.duration()),
                    yes_no(anim.looping),
                ],
            );
        }
        table.printstd();
    }

    Ok(())
}

pub fn tree(
    file: &Path,
    options: &LoadOptions,
    depth: Option<usize>,
    no_color: bool,
) -> Result<()> {
    let skeleton = load(file, options)?;

    let name = file
        .file_name()
        .map_or_else(|| file.display().to_string(), |n| n.to_string_lossy().into_owned());
    let root = skeleton_tree(&skeleton, name);

    let tree_options = TreeOptions {
        max_depth: depth,
        no_color,
        ..Default::default()
    };
    print!("{}", render_tree(&root, &tree_options));

    Ok(())
}

pub fn validate(file: &Path, options: &LoadOptions) -> Result<()> {
    let skeleton = load(file, options)?;

    println!(
        "✓ {} is valid: {} bones, {} animations, {} frames",
        file.display(),
        skeleton.bone_count(),
        skeleton.animations().len(),
        skeleton.frame_count()
    );
    Ok(())
}

/// Build a display tree of the bone hierarchy
pub fn skeleton_tree(skeleton: &Skeleton, name: String) -> TreeNode {
    let mut root = TreeNode::new(name, NodeType::Root)
        .with_metadata("bones", &skeleton.bone_count().to_string())
        .with_metadata("animations", &skeleton.animations().len().to_string());

    for (index, bone) in skeleton.bones().iter().enumerate() {
        if bone.is_root() {
            root = root.add_child(bone_node(skeleton, index));
        }
    }

    if !skeleton.animations().is_empty() {
        let mut clips = TreeNode::new("Animations".to_string(), NodeType::Group);
        for anim in skeleton.animations() {
            clips = clips.add_child(
                TreeNode::new(anim.name.clone(), NodeType::Animation)
                    .with_metadata("frames", &anim.num_frames.to_string())
                    .with_metadata("fps", &format!("{:.1}", anim.framerate)),
            );
        }
        root = root.add_child(clips);
    }

    root
}

fn bone_node(skeleton: &Skeleton, index: usize) -> TreeNode {
    let bone = &skeleton.bones()[index];
    let origin = bone.base_pose.w_axis;

    let mut node = TreeNode::new(format!("[{index}] {}", bone.name), NodeType::Bone)
        .with_metadata(
            "origin",
            &format!("({:.3}, {:.3}, {:.3})", origin.x, origin.y, origin.z),
        );

    for child in skeleton.children(index) {
        node = node.add_child(bone_node(skeleton, child));
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonework_skeleton::{ImportData, ImportJoint, load_skeleton};

    #[test]
    fn test_skeleton_tree_follows_hierarchy() {
        let data = ImportData::from_joints(vec![
            ImportJoint::new("hip", None),
            ImportJoint::new("spine", Some(0)),
            ImportJoint::new("leg", Some(0)),
            ImportJoint::new("head", Some(1)),
        ]);
        let skeleton = load_skeleton(&data).unwrap();

        let tree = skeleton_tree(&skeleton, "rig.json".to_string());
        assert_eq!(tree.children.len(), 1);

        let hip = &tree.children[0];
        assert_eq!(hip.name, "[0] hip");
        let names: Vec<&str> = hip.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["[1] spine", "[2] leg"]);
        assert_eq!(hip.children[0].children[0].name, "[3] head");
    }
}
