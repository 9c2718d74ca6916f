table! {
    blogs (id) {
        id -> Int4,
        title -> Varchar,
        body -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        is_archived -> Bool,
        author_id -> Int4,
    }
}

table! {
    comments (id) {
        id -> Int4,
        content -> Varchar,
        is_updated -> Bool,
        is_archived -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        user_id -> Int4,
        post_id -> Int4,
    }
}

table! {
    likes (id) {
        id -> Int4,
        user_id -> Int4,
        post_id -> Int4,
        created_at -> Timestamptz,
    }
}

table! {
    users (id) {
        id -> Int4,
        name -> Varchar,
        username -> Varchar,
        email -> Varchar,
        password -> Varchar,
        created_at -> Timestamptz,
    }
}

joinable!(blogs -> users (author_id));
joinable!(comments -> blogs (post_id));
joinable!(comments -> users (user_id));
joinable!(likes -> blogs (post_id));
joinable!(likes -> users (user_id));

allow_tables_to_appear_in_same_query!(
    blogs,
    comments,
    likes,
    users,
);
