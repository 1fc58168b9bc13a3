//! Tests for the document state machine

use treedoc::util::testing::init_test_setup;
use treedoc::{Clipboard, Document, DocumentError, Location, StructuralError};

fn doc() -> Document {
    init_test_setup();
    Document::new(Clipboard::new())
}

/// Root "TP" with children "DP" and "VP"; selection left on the root.
fn two_child_doc() -> Document {
    let mut doc = doc();
    let root = doc.add(Location::Child, Some("TP"), None).unwrap();
    doc.add(Location::Child, Some("DP"), None).unwrap();
    doc.select(root).unwrap();
    doc.add(Location::Child, Some("VP"), None).unwrap();
    doc.select(root).unwrap();
    doc
}

fn labels_of_children(doc: &Document, node: generational_arena::Index) -> Vec<String> {
    doc.tree()
        .get(node)
        .unwrap()
        .children
        .iter()
        .map(|&c| doc.tree().get(c).unwrap().data.label.clone().unwrap())
        .collect()
}

// ============================================================
// Add Tests
// ============================================================

#[test]
fn given_empty_document_when_adding_then_node_becomes_root_and_selection() {
    let mut doc = doc();
    assert!(doc.is_empty());
    assert!(!doc.is_dirty());

    let node = doc.add(Location::Sibling, Some("TP"), None).unwrap();

    assert!(!doc.is_empty());
    assert!(doc.is_dirty());
    assert_eq!(doc.tree().root(), Some(node));
    assert_eq!(doc.selection(), Some(node));
}

#[test]
fn given_no_selection_when_adding_to_nonempty_document_then_rejected() {
    let mut doc = doc();
    doc.add(Location::Child, Some("TP"), None).unwrap();
    doc.clear_selection();

    let result = doc.add(Location::Child, Some("DP"), None);

    assert!(matches!(result, Err(DocumentError::NoSelection)));
}

#[test]
fn given_selection_when_adding_child_then_attached_under_it() {
    let mut doc = doc();
    let root = doc.add(Location::Child, Some("TP"), None).unwrap();

    let child = doc.add(Location::Child, Some("DP"), None).unwrap();

    assert_eq!(doc.tree().get(child).unwrap().parent, Some(root));
    assert_eq!(doc.selection(), Some(child));
}

#[test]
fn given_root_selected_when_adding_parent_then_root_replaced() {
    let mut doc = doc();
    let old_root = doc.add(Location::Child, Some("TP"), None).unwrap();

    let new_root = doc.add(Location::Parent, Some("CP"), None).unwrap();

    assert_eq!(doc.tree().root(), Some(new_root));
    assert_eq!(doc.tree().get(old_root).unwrap().parent, Some(new_root));
    assert_eq!(labels_of_children(&doc, new_root), vec!["TP"]);
}

#[test]
fn given_mid_node_selected_when_adding_parent_then_spliced_in_place() {
    let mut doc = two_child_doc();
    let root = doc.tree().root().unwrap();
    let dp = doc.tree().get(root).unwrap().children[0];
    doc.select(dp).unwrap();

    let np = doc.add(Location::Parent, Some("NP"), None).unwrap();

    assert_eq!(labels_of_children(&doc, root), vec!["NP", "VP"]);
    assert_eq!(doc.tree().get(dp).unwrap().parent, Some(np));
    assert_eq!(doc.tree().get(np).unwrap().children, vec![dp]);
}

#[test]
fn given_root_selected_when_adding_sibling_then_structural_error() {
    let mut doc = doc();
    doc.add(Location::Child, Some("TP"), None).unwrap();

    let result = doc.add(Location::Sibling, Some("DP"), None);

    assert!(matches!(
        result,
        Err(DocumentError::Structural(StructuralError::RootSibling))
    ));
}

#[test]
fn given_child_selected_when_adding_sibling_then_appended_to_parent() {
    let mut doc = doc();
    let root = doc.add(Location::Child, Some("TP"), None).unwrap();
    doc.add(Location::Child, Some("DP"), None).unwrap();

    doc.add(Location::Sibling, Some("VP"), None).unwrap();

    assert_eq!(labels_of_children(&doc, root), vec!["DP", "VP"]);
}

#[test]
fn given_empty_strings_when_adding_then_stored_absent() {
    let mut doc = doc();

    let node = doc.add(Location::Child, Some(""), Some("")).unwrap();

    let data = &doc.tree().get(node).unwrap().data;
    assert!(data.label.is_none());
    assert!(data.value.is_none());
}

// ============================================================
// Edit Tests
// ============================================================

#[test]
fn given_no_selection_when_editing_then_rejected() {
    let mut doc = doc();
    doc.add(Location::Child, Some("TP"), None).unwrap();
    doc.clear_selection();

    assert!(matches!(
        doc.edit(Some("DP"), None),
        Err(DocumentError::NoSelection)
    ));
}

#[test]
fn given_selection_when_editing_label_then_updated() {
    let mut doc = doc();
    let node = doc.add(Location::Child, Some("TP"), None).unwrap();

    doc.edit(Some("CP"), Some("comp")).unwrap();

    let data = &doc.tree().get(node).unwrap().data;
    assert_eq!(data.label.as_deref(), Some("CP"));
    assert_eq!(data.value.as_deref(), Some("comp"));
}

#[test]
fn given_empty_string_when_editing_then_field_cleared() {
    let mut doc = doc();
    let node = doc.add(Location::Child, Some("D"), Some("the")).unwrap();

    doc.edit(None, Some("")).unwrap();

    let data = &doc.tree().get(node).unwrap().data;
    assert_eq!(data.label.as_deref(), Some("D"), "untouched field survives");
    assert!(data.value.is_none());
}

#[test]
fn given_unchanged_fields_when_editing_then_not_dirtied() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.treedoc");
    let mut doc = doc();
    doc.add(Location::Child, Some("TP"), None).unwrap();
    doc.save(Some(&path)).unwrap();
    assert!(!doc.is_dirty());

    doc.edit(Some("TP"), None).unwrap();
    assert!(!doc.is_dirty(), "same label is not a change");

    doc.edit(Some("CP"), None).unwrap();
    assert!(doc.is_dirty());
}

// ============================================================
// Delete Tests
// ============================================================

#[test]
fn given_no_selection_when_deleting_then_rejected() {
    let mut doc = doc();
    doc.add(Location::Child, Some("TP"), None).unwrap();
    doc.clear_selection();

    assert!(matches!(doc.delete(), Err(DocumentError::NoSelection)));
}

#[test]
fn given_root_selected_when_deleting_then_document_empties() {
    let mut doc = two_child_doc();

    doc.delete().unwrap();

    assert!(doc.is_empty());
    assert_eq!(doc.selection(), None);
    assert!(doc.is_dirty());
}

#[test]
fn given_child_selected_when_deleting_then_selection_moves_to_parent() {
    let mut doc = two_child_doc();
    let root = doc.tree().root().unwrap();
    let dp = doc.tree().get(root).unwrap().children[0];
    doc.select(dp).unwrap();

    doc.delete().unwrap();

    assert_eq!(doc.selection(), Some(root));
    assert_eq!(labels_of_children(&doc, root), vec!["VP"]);
    assert!(doc.tree().get(dp).is_none(), "deleted nodes leave the arena");
}

// ============================================================
// Clipboard Tests
// ============================================================

#[test]
fn given_no_selection_when_copying_then_rejected() {
    let mut doc = doc();
    doc.add(Location::Child, Some("TP"), None).unwrap();
    doc.clear_selection();

    assert!(matches!(doc.copy(), Err(DocumentError::NoSelection)));
}

#[test]
fn given_empty_clipboard_when_pasting_then_rejected() {
    let mut doc = doc();

    assert!(matches!(
        doc.paste(Location::Child),
        Err(DocumentError::EmptyClipboard)
    ));
}

#[test]
fn given_shared_clipboard_when_copying_then_other_document_can_paste() {
    init_test_setup();
    let clipboard = Clipboard::new();
    let mut source = Document::new(clipboard.clone());
    source.add(Location::Child, Some("DP"), None).unwrap();
    source.add(Location::Child, Some("D"), Some("the")).unwrap();
    let dp = source.tree().root().unwrap();
    source.select(dp).unwrap();
    source.copy().unwrap();

    let mut target = Document::new(clipboard);
    let pasted = target.paste(Location::Child).unwrap();

    assert_eq!(target.tree().root(), Some(pasted));
    let record = target.tree().to_record(pasted).unwrap();
    assert_eq!(record.label.as_deref(), Some("DP"));
    assert_eq!(record.children[0].value.as_deref(), Some("the"));
}

#[test]
fn given_clipboard_content_when_pasting_twice_then_fresh_nodes_each_time() {
    let mut doc = two_child_doc();
    doc.copy().unwrap();

    let first = doc.paste(Location::Child).unwrap();
    let root = doc.tree().root().unwrap();
    doc.select(root).unwrap();
    let second = doc.paste(Location::Child).unwrap();

    assert_ne!(first, second);
    assert_eq!(
        doc.tree().to_record(first).unwrap(),
        doc.tree().to_record(second).unwrap()
    );
}

#[test]
fn given_clipboard_content_when_pasting_then_slot_not_consumed() {
    let mut doc = two_child_doc();
    doc.copy().unwrap();

    doc.paste(Location::Child).unwrap();

    let root = doc.tree().root().unwrap();
    doc.select(root).unwrap();
    assert!(doc.paste(Location::Child).is_ok(), "paste reads, not takes");
}

// ============================================================
// Move Tests
// ============================================================

#[test]
fn given_no_selection_when_moving_then_rejected() {
    let mut doc = doc();
    doc.add(Location::Child, Some("TP"), None).unwrap();
    doc.clear_selection();

    assert!(matches!(doc.move_up(), Err(DocumentError::NoSelection)));
    assert!(matches!(doc.move_down(), Err(DocumentError::NoSelection)));
}

#[test]
fn given_root_selected_when_moving_then_rejected() {
    let mut doc = doc();
    doc.add(Location::Child, Some("TP"), None).unwrap();

    assert!(matches!(doc.move_up(), Err(DocumentError::RootImmutable)));
    assert!(matches!(doc.move_down(), Err(DocumentError::RootImmutable)));
}

#[test]
fn given_second_child_selected_when_moving_up_then_siblings_swap() {
    let mut doc = two_child_doc();
    let root = doc.tree().root().unwrap();
    let vp = doc.tree().get(root).unwrap().children[1];
    doc.select(vp).unwrap();

    doc.move_up().unwrap();

    assert_eq!(labels_of_children(&doc, root), vec!["VP", "DP"]);
}

#[test]
fn given_first_child_when_moving_up_then_clamped_noop() {
    let mut doc = two_child_doc();
    let root = doc.tree().root().unwrap();
    let dp = doc.tree().get(root).unwrap().children[0];
    doc.select(dp).unwrap();

    doc.move_up().unwrap();

    assert_eq!(labels_of_children(&doc, root), vec!["DP", "VP"]);
}

#[test]
fn given_last_child_when_moving_down_then_clamped_noop() {
    let mut doc = two_child_doc();
    let root = doc.tree().root().unwrap();
    let vp = doc.tree().get(root).unwrap().children[1];
    doc.select(vp).unwrap();

    doc.move_down().unwrap();

    assert_eq!(labels_of_children(&doc, root), vec!["DP", "VP"]);
}

#[test]
fn given_boundary_move_when_clamped_then_not_dirtied() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.treedoc");
    let mut doc = two_child_doc();
    let root = doc.tree().root().unwrap();
    let dp = doc.tree().get(root).unwrap().children[0];
    doc.save(Some(&path)).unwrap();
    doc.select(dp).unwrap();

    doc.move_up().unwrap();
    assert!(!doc.is_dirty());

    doc.move_down().unwrap();
    assert!(doc.is_dirty());
}

// ============================================================
// Notes and Export Surface Tests
// ============================================================

#[test]
fn given_notes_when_set_then_readable_and_dirtying() {
    let mut doc = doc();
    assert_eq!(doc.notes(), "");

    doc.set_notes("the cactus flowered");

    assert_eq!(doc.notes(), "the cactus flowered");
    assert!(doc.is_dirty());
}

#[test]
fn given_empty_document_when_exporting_then_rejected() {
    let doc = doc();

    assert!(matches!(doc.to_latex(), Err(DocumentError::EmptyDocument)));
    assert!(matches!(doc.to_dot(), Err(DocumentError::EmptyDocument)));
}

#[test]
fn given_populated_document_when_exporting_then_renders_both_formats() {
    let doc = two_child_doc();

    let latex = doc.to_latex().unwrap();
    let dot = doc.to_dot().unwrap();

    assert!(latex.contains("\\Tree [.TP\n"));
    assert!(dot.contains("TP -- DP"));
}

// ============================================================
// Save Tests
// ============================================================

#[test]
fn given_no_path_anywhere_when_saving_then_rejected() {
    let mut doc = two_child_doc();

    assert!(matches!(doc.save(None), Err(DocumentError::NoDestination)));
}

#[test]
fn given_saved_document_when_saving_again_then_last_path_reused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.treedoc");
    let mut doc = two_child_doc();
    doc.save(Some(&path)).unwrap();
    assert_eq!(doc.last_path(), Some(path.as_path()));

    doc.set_notes("more");
    doc.save(None).unwrap();

    assert!(!doc.is_dirty());
}

#[test]
fn given_gv_extension_when_saving_then_dot_source_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.gv");
    let mut doc = two_child_doc();

    doc.save(Some(&path)).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("graph {"));
    assert!(doc.is_dirty(), "a source export is not a container save");
    assert_eq!(doc.last_path(), None);
}
