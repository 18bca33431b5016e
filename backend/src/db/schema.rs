// The SQL table has no key constraint. The key listed here only satisfies the
// table! macro, rows are inserted in parse order and never updated.

diesel::table! {
    latin_text (title, book, chapter, verse) {
        title -> Text,
        book -> Text,
        language -> Text,
        author -> Text,
        dates -> Text,
        chapter -> Text,
        verse -> BigInt,
        passage -> Text,
        link -> Text,
    }
}
