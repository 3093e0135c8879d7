// Diesel table definitions. Kept in sync with the CREATE TABLE statements in
// `repository::diesel_context`.

diesel::table! {
    documents (id) {
        id -> BigInt,
        number -> Text,
        #[sql_name = "type"]
        doc_type -> Text,
        name -> Text,
        file_path -> Text,
        issued_date -> Nullable<Text>,
        created_at -> Text,
        file_size -> BigInt,
        file_name_original -> Text,
    }
}
