use sidecat_index::{
    CategoryIndex, CategoryType, IndexError, MediaKind, Node, ResourceRef, TreeRenderer,
    UNCATEGORIZED, render_kind,
};

fn video(path: &str) -> ResourceRef {
    ResourceRef::file(path, MediaKind::Video)
}

#[test]
fn test_acquire_returns_same_category_type() {
    let mut index = CategoryIndex::new();

    let first: *const CategoryType = index.acquire_category_type(MediaKind::Video, Some("A"), "Genre");
    let second: *const CategoryType = index.acquire_category_type(MediaKind::Video, Some("A"), "Genre");
    assert_eq!(first, second);

    index
        .acquire_category_type(MediaKind::Video, Some("A"), "Genre")
        .add_resource(video("/lib/a.mp4"), "Action")
        .unwrap();
    let genre = index.acquire_category_type(MediaKind::Video, Some("A"), "Genre");
    assert_eq!(genre.resource_count(), 1);
}

#[test]
fn test_same_resource_added_once() {
    let mut category = CategoryType::new("Genre");
    let movie = video("/lib/a.mp4");

    assert!(category.add_resource(movie.clone(), "Action").unwrap());
    assert!(!category.add_resource(movie, "Action").unwrap());
    // An equal handle for the same file is a duplicate too.
    assert!(!category.add_resource(video("/lib/a.mp4"), "Action").unwrap());

    assert_eq!(category.resources("Action").unwrap().len(), 1);
}

#[test]
fn test_empty_value_is_rejected() {
    let mut category = CategoryType::new("Genre");
    let err = category.add_resource(video("/lib/a.mp4"), "   ").unwrap_err();
    assert_eq!(
        err,
        IndexError::EmptyCategoryValue {
            category_type: "Genre".to_string()
        }
    );
    assert!(category.is_empty());
}

#[test]
fn test_queries_sorted_regardless_of_insertion_order() {
    let mut index = CategoryIndex::new();
    for master in ["Zeta", "alpha", "Beta"] {
        for type_name in ["Year", "Actor", "Genre"] {
            index.acquire_category_type(MediaKind::Image, Some(master), type_name);
        }
    }

    assert_eq!(
        index.master_categories(MediaKind::Image),
        vec!["Beta", "Zeta", "alpha"]
    );
    assert_eq!(
        index.categories_for_master(MediaKind::Image, "alpha"),
        Some(vec!["Actor", "Genre", "Year"])
    );
}

#[test]
fn test_single_kind_collapses_into_root() {
    let mut index = CategoryIndex::new();
    index
        .register(MediaKind::Video, None, "Genre", "Action", video("/lib/a.mp4"))
        .unwrap();

    for kind in [MediaKind::Audio, MediaKind::Image, MediaKind::Unknown] {
        assert!(!index.has_content(kind));
    }

    let tree = TreeRenderer::new().render(&index);
    assert_eq!(tree.child_names(), vec!["Genre"]);
    assert!(tree.folder("Videos").is_none());
}

#[test]
fn test_kind_sections_follow_enum_order() {
    let mut index = CategoryIndex::new();
    index
        .register(
            MediaKind::Image,
            None,
            "Event",
            "Wedding",
            ResourceRef::file("/p/w.jpg", MediaKind::Image),
        )
        .unwrap();
    index
        .register(MediaKind::Video, None, "Genre", "Action", video("/v/a.mp4"))
        .unwrap();

    let tree = TreeRenderer::with_root_name("Library").render(&index);
    assert_eq!(tree.name, "Library");
    assert_eq!(tree.child_names(), vec!["Videos", "Photos"]);
}

#[test]
fn test_render_kind_single_master_is_flat() {
    let mut index = CategoryIndex::new();
    let movie = video("/lib/a.mp4");
    index
        .register(MediaKind::Video, Some("Films"), "Year", "1999", movie.clone())
        .unwrap();
    index
        .register(MediaKind::Video, Some("Films"), "Genre", "Action", movie)
        .unwrap();

    let nodes = render_kind(&index, MediaKind::Video);
    let names: Vec<_> = nodes.iter().map(Node::name).collect();
    assert_eq!(names, vec!["Genre", "Year"]);
}

#[test]
fn test_reset_keeps_rendered_trees() {
    let mut index = CategoryIndex::new();
    index
        .register(MediaKind::Video, None, "Genre", "Action", video("/lib/a.mp4"))
        .unwrap();

    let tree = TreeRenderer::new().render(&index);
    index.reset();

    assert!(index.is_empty());
    assert_eq!(index.master_categories(MediaKind::Video), Vec::<&str>::new());
    let action = tree.descend(&["Genre", "Action"]).unwrap();
    assert_eq!(action.child_names(), vec!["a.mp4"]);
}

#[test]
fn test_uncategorized_master_is_explicitly_addressable() {
    let mut index = CategoryIndex::new();
    index
        .register(MediaKind::Audio, None, "Artist", "Someone", ResourceRef::file("/m/s.mp3", MediaKind::Audio))
        .unwrap();
    index
        .register(
            MediaKind::Audio,
            Some(UNCATEGORIZED),
            "Artist",
            "Someone",
            ResourceRef::file("/m/s.mp3", MediaKind::Audio),
        )
        .unwrap();

    let artist = index.category_type(MediaKind::Audio, None, "Artist").unwrap();
    assert_eq!(artist.resource_count(), 1);
}

#[test]
fn test_tree_serializes_to_json() {
    let mut index = CategoryIndex::new();
    index
        .register(MediaKind::Video, None, "Genre", "Action", video("/lib/a.mp4"))
        .unwrap();

    let tree = TreeRenderer::new().render(&index);
    let json = serde_json::to_value(&tree).unwrap();

    assert_eq!(json["name"], "Categories");
    let genre = &json["children"][0];
    assert_eq!(genre["node"], "folder");
    assert_eq!(genre["name"], "Genre");
    let movie = &genre["children"][0]["children"][0];
    assert_eq!(movie["node"], "resource");
    assert_eq!(movie["name"], "a.mp4");
    assert_eq!(movie["type"], "file");
    assert_eq!(movie["kind"], "Video");

    let index_json = serde_json::to_value(&index).unwrap();
    assert!(index_json["kinds"]["Video"]["Uncategorized"]["Genre"].is_object());
}
