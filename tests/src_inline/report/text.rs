use super::*;
use crate::config::ViewProfile;
use crate::input::load_dataset_from_reader;
use crate::pipeline::controller::ViewBoard;

const CSV: &str = "COMP_NAME,INSURANCE_TYPE,COMP_SIZE,ROE,EWS_GROUP,total_weighted_score,cat1_weighted_score,cat2_weighted_score,cat3_weighted_score,cat4_weighted_score,cat5_weighted_score
Alpha,Nonlife,S,low,G1,10,1,2,3,4,5
Beta,Nonlife,M,high,G2,30,1,2,3,4,5
Gamma,Nonlife,M,all,G1,20,1,2,3,4,
";

fn board() -> ViewBoard {
    let profile = ViewProfile::nonlife_v1();
    let ds = load_dataset_from_reader(CSV.as_bytes(), &profile).unwrap();
    ViewBoard::from_profile(ds, &profile).unwrap()
}

#[test]
fn test_render_view_text() {
    let mut b = board();
    let snapshot = b.dispatch("size", "M").unwrap();
    let text = render_view_text(snapshot, None);
    assert!(text.starts_with("Nonlife Insurance - Total Weighted score - SIZE\n"));
    assert!(text.contains("selection: M (2 rows)"));
    assert!(text.contains("COMP_NAME"));
    let beta = text.find("Beta").unwrap();
    let gamma = text.find("Gamma").unwrap();
    assert!(beta < gamma);
    assert!(!text.contains("Alpha"));
}

#[test]
fn test_render_view_text_truncates_rows() {
    let b = board();
    let snapshot = b.controller("size").unwrap().snapshot();
    let text = render_view_text(snapshot, Some(1));
    assert!(text.contains("Beta"));
    assert!(!text.contains("Alpha"));
    assert!(text.contains("... 2 more rows"));
}

#[test]
fn test_render_groups_notes_collision() {
    let b = board();
    let groups: Vec<&FilterGroup> = b.controllers().iter().map(|c| c.group()).collect();
    let text = render_groups_text(&groups);
    assert!(text.contains("size (COMP_SIZE): all, M, S"));
    assert!(text.contains("roe (ROE): all, high, all, low"));
    assert_eq!(text.matches("note:").count(), 1);
}
