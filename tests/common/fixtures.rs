use trellis::model::definition::{
    BranchCase, DefEdge, DefNode, DefNodeKind, WorkflowDefinition, WorkflowSection,
};
use trellis::types::{END_NODE_ID, START_NODE_ID};

/// start -> t0 -> t1 -> end, no nesting.
pub fn linear_definition() -> WorkflowDefinition {
    WorkflowDefinition {
        id: "wf.linear".into(),
        nodes: vec![DefNode::task("t0"), DefNode::task("t1")],
        edges: vec![
            DefEdge::new(START_NODE_ID, "t0"),
            DefEdge::new("t0", "t1"),
            DefEdge::new("t1", END_NODE_ID),
        ],
        ..WorkflowDefinition::default()
    }
}

/// start -> sub(t0 -> t1) -> end; the sub-workflow section is statically
/// known.
pub fn one_subworkflow_definition() -> WorkflowDefinition {
    let mut definition = WorkflowDefinition {
        id: "wf.sub".into(),
        nodes: vec![DefNode::subworkflow("sub", "wf.sub.inner")],
        edges: vec![
            DefEdge::new(START_NODE_ID, "sub"),
            DefEdge::new("sub", END_NODE_ID),
        ],
        ..WorkflowDefinition::default()
    };
    definition
        .sub_workflows
        .insert("wf.sub.inner".into(), two_task_section());
    definition
}

/// start -> dyn -> end; the dynamic node's children arrive at runtime.
pub fn dynamic_definition() -> WorkflowDefinition {
    WorkflowDefinition {
        id: "wf.dyn".into(),
        nodes: vec![DefNode::dynamic("dyn")],
        edges: vec![
            DefEdge::new(START_NODE_ID, "dyn"),
            DefEdge::new("dyn", END_NODE_ID),
        ],
        ..WorkflowDefinition::default()
    }
}

/// start -> br{case a: ta, case b: tb} -> end.
pub fn branch_definition() -> WorkflowDefinition {
    let branch = DefNode {
        id: "br".into(),
        name: "br".into(),
        kind: DefNodeKind::Branch {
            cases: vec![
                BranchCase {
                    label: "x > 3".into(),
                    section: WorkflowSection {
                        nodes: vec![DefNode::task("ta")],
                        edges: vec![
                            DefEdge::new(START_NODE_ID, "ta"),
                            DefEdge::new("ta", END_NODE_ID),
                        ],
                    },
                },
                BranchCase {
                    label: "otherwise".into(),
                    section: WorkflowSection {
                        nodes: vec![DefNode::task("tb")],
                        edges: vec![
                            DefEdge::new(START_NODE_ID, "tb"),
                            DefEdge::new("tb", END_NODE_ID),
                        ],
                    },
                },
            ],
        },
        task: None,
    };
    WorkflowDefinition {
        id: "wf.branch".into(),
        nodes: vec![branch],
        edges: vec![
            DefEdge::new(START_NODE_ID, "br"),
            DefEdge::new("br", END_NODE_ID),
        ],
        ..WorkflowDefinition::default()
    }
}

/// Three levels of nesting: outer -> inner -> leaf0.
pub fn deep_definition() -> WorkflowDefinition {
    let mut definition = WorkflowDefinition {
        id: "wf.deep".into(),
        nodes: vec![DefNode::subworkflow("outer", "wf.deep.mid")],
        edges: vec![
            DefEdge::new(START_NODE_ID, "outer"),
            DefEdge::new("outer", END_NODE_ID),
        ],
        ..WorkflowDefinition::default()
    };
    definition.sub_workflows.insert(
        "wf.deep.mid".into(),
        WorkflowSection {
            nodes: vec![DefNode::subworkflow("inner", "wf.deep.leaf")],
            edges: vec![
                DefEdge::new(START_NODE_ID, "inner"),
                DefEdge::new("inner", END_NODE_ID),
            ],
        },
    );
    definition.sub_workflows.insert(
        "wf.deep.leaf".into(),
        WorkflowSection {
            nodes: vec![DefNode::task("leaf0")],
            edges: vec![
                DefEdge::new(START_NODE_ID, "leaf0"),
                DefEdge::new("leaf0", END_NODE_ID),
            ],
        },
    );
    definition
}

/// A two-task section, usable as a sub-workflow or a dynamic resolution.
pub fn two_task_section() -> WorkflowSection {
    WorkflowSection {
        nodes: vec![DefNode::task("t0"), DefNode::task("t1")],
        edges: vec![
            DefEdge::new(START_NODE_ID, "t0"),
            DefEdge::new("t0", "t1"),
            DefEdge::new("t1", END_NODE_ID),
        ],
    }
}
