//! Tree rendering for scene hierarchies

use bonebake_scene::{NodeId, Scene};
use console::Style;
use std::collections::HashSet;

/// A node in a rendered tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    pub children: Vec<TreeNode>,
    /// Ordered key/value annotations
    pub metadata: Vec<(String, String)>,
    /// Meshes placed at this node
    pub attachments: Vec<String>,
}

/// Role of a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Root,
    /// Driven by a channel of some animation
    Animated,
    /// Referenced by a mesh bone, but not animated
    Bone,
    Static,
}

/// Options for tree rendering
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub no_color: bool,
    pub show_metadata: bool,
    pub compact: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            no_color: false,
            show_metadata: true,
            compact: false,
        }
    }
}

impl TreeNode {
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            children: Vec::new(),
            metadata: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn add_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.push((key.to_string(), value.into()));
        self
    }

    pub fn with_attachment(mut self, name: impl Into<String>) -> Self {
        self.attachments.push(name.into());
        self
    }
}

impl NodeType {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Root => "📁",
            Self::Animated => "🎞️",
            Self::Bone => "🦴",
            Self::Static => "•",
        }
    }

    pub fn style(self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self {
                Self::Root => Style::new().bold().cyan(),
                Self::Animated => Style::new().green(),
                Self::Bone => Style::new().yellow(),
                Self::Static => Style::new().dim(),
            }
        }
    }
}

/// Convert the scene hierarchy into a renderable tree
pub fn scene_tree(scene: &Scene) -> TreeNode {
    let animated: HashSet<&str> = scene
        .animations()
        .iter()
        .flat_map(|a| a.channels.iter().map(|c| c.node_name.as_str()))
        .collect();
    let bones: HashSet<&str> = scene
        .meshes()
        .iter()
        .flat_map(|m| m.bones.iter().map(|b| b.name.as_str()))
        .collect();

    build_node(scene, scene.root(), &animated, &bones)
}

fn build_node(
    scene: &Scene,
    id: NodeId,
    animated: &HashSet<&str>,
    bones: &HashSet<&str>,
) -> TreeNode {
    let Some(node) = scene.node(id) else {
        return TreeNode::new(format!("<missing {id}>"), NodeType::Static);
    };

    let node_type = if node.is_root() {
        NodeType::Root
    } else if animated.contains(node.name.as_str()) {
        NodeType::Animated
    } else if bones.contains(node.name.as_str()) {
        NodeType::Bone
    } else {
        NodeType::Static
    };

    let mut tree =
        TreeNode::new(node.name.clone(), node_type).with_metadata("id", id.to_string());
    if node.transform != glam::Mat4::IDENTITY {
        let translation = node.transform.w_axis.truncate();
        tree = tree.with_metadata(
            "translation",
            format!("{:.3}, {:.3}, {:.3}", translation.x, translation.y, translation.z),
        );
    }
    for &mesh_index in &node.meshes {
        let name = scene.name_of_mesh(mesh_index).unwrap_or("?");
        tree = tree.with_attachment(format!("mesh {mesh_index} '{name}'"));
    }

    node.children.iter().fold(tree, |tree, &child| {
        tree.add_child(build_node(scene, child, animated, bones))
    })
}

/// Render a tree structure to string
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if let Some(max_depth) = options.max_depth
        && depth > max_depth
    {
        return;
    }

    let style = node.node_type.style(options.no_color);
    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    let mut line = format!(
        "{}{}{} {}",
        prefix,
        connector,
        node.node_type.icon(),
        style.apply_to(&node.name)
    );

    if options.show_metadata && options.compact && !node.metadata.is_empty() {
        let parts: Vec<String> = node
            .metadata
            .iter()
            .map(|(key, value)| format!("{key}:{value}"))
            .collect();
        line.push_str(&format!(" [{}]", parts.join(", ")));
    }

    output.push_str(&line);
    output.push('\n');

    let child_prefix = if depth == 0 {
        ""
    } else if is_last {
        "    "
    } else {
        "│   "
    };
    let detail_prefix = format!("{prefix}{child_prefix}    ");

    if options.show_metadata && !options.compact {
        let meta_style = if options.no_color {
            Style::new()
        } else {
            Style::new().dim()
        };
        for (key, value) in &node.metadata {
            output.push_str(&format!(
                "{}🏷️  {}: {}\n",
                detail_prefix,
                meta_style.apply_to(key),
                value
            ));
        }
    }

    let attachment_style = if options.no_color {
        Style::new()
    } else {
        Style::new().magenta()
    };
    for attachment in &node.attachments {
        output.push_str(&format!(
            "{}└─→ 🧊 {}\n",
            detail_prefix,
            attachment_style.apply_to(attachment)
        ));
    }

    let new_prefix = if depth == 0 {
        String::new()
    } else {
        format!("{prefix}{child_prefix}")
    };
    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i + 1 == node.children.len();
        render_node(child, output, &new_prefix, is_last_child, depth + 1, options);
    }
}
