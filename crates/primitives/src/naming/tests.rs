use proptest::prelude::*;

use super::*;

#[test]
fn test_id_name_grammar() {
	assert!(is_valid_id_name("panel"));
	assert!(is_valid_id_name("a1_b2"));
	assert!(is_valid_id_name("Z"));
	assert!(!is_valid_id_name(""));
	assert!(!is_valid_id_name("1panel"));
	assert!(!is_valid_id_name("_panel"));
	assert!(!is_valid_id_name("pa-nel"));
	assert!(!is_valid_id_name("pa nel"));
}

#[test]
fn test_id_name_parse_rejects_bad_input() {
	assert_eq!(IdName::parse("field").map(|n| n.to_string()), Ok("field".to_string()));
	assert_eq!(IdName::parse("9lives"), Err(IdNameError("9lives".to_string())));
}

#[test]
fn test_append_index_plain_after_letter() {
	let mut s = String::from("id_a");
	append_index(&mut s, 12);
	assert_eq!(s, "id_a12");
}

#[test]
fn test_append_index_shifts_after_digit() {
	let mut s = String::from("0");
	append_index(&mut s, 12);
	assert_eq!(s, "0bc");

	let mut s = String::from("x9");
	append_index(&mut s, 0);
	assert_eq!(s, "x9a");
}

#[test]
fn test_one_then_two_differs_from_twelve() {
	let mut twelve = String::from("1");
	append_index(&mut twelve, 12);

	let mut one_two = String::from("1");
	append_index(&mut one_two, 1);
	append_index(&mut one_two, 2);

	assert_eq!(twelve, "1bc");
	assert_eq!(one_two, "1b2");
	assert_ne!(twelve, one_two);
}

fn path_id(path: &[usize]) -> String {
	let mut s = String::from("0");
	for &index in path {
		append_index(&mut s, index);
	}
	s
}

proptest! {
	#[test]
	fn prop_distinct_paths_give_distinct_ids(
		a in prop::collection::vec(0usize..40, 0..6),
		b in prop::collection::vec(0usize..40, 0..6),
	) {
		prop_assume!(a != b);
		prop_assert_ne!(path_id(&a), path_id(&b));
	}

	#[test]
	fn prop_generated_segments_alternate(path in prop::collection::vec(0usize..1000, 1..6)) {
		let id = path_id(&path);
		prop_assert!(id.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'j').contains(&b)));
	}
}
