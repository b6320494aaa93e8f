table! {
    categories (id) {
        id -> Integer,
        name -> Text,
        slug -> Text,
        description -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    comments (id) {
        id -> Integer,
        author -> Text,
        email -> Text,
        content -> Text,
        created_at -> Timestamp,
        post_id -> Integer,
    }
}

table! {
    post_tags (post_id, tag_id) {
        post_id -> Integer,
        tag_id -> Integer,
    }
}

table! {
    posts (id) {
        id -> Integer,
        title -> Text,
        slug -> Text,
        content -> Text,
        excerpt -> Nullable<Text>,
        cover_image -> Nullable<Text>,
        published -> Bool,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        category_id -> Nullable<Integer>,
    }
}

table! {
    tags (id) {
        id -> Integer,
        name -> Text,
        slug -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

joinable!(comments -> posts (post_id));
joinable!(post_tags -> posts (post_id));
joinable!(post_tags -> tags (tag_id));
joinable!(posts -> categories (category_id));

allow_tables_to_appear_in_same_query!(
    categories,
    comments,
    post_tags,
    posts,
    tags,
);
