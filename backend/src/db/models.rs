use diesel::prelude::*;

use crate::db::schema::latin_text;
use crate::types::{Chapter, Record};

#[derive(Insertable)]
#[diesel(table_name = latin_text)]
pub struct NewLatinText<'a> {
    pub title: &'a str,
    pub book: &'a str,
    pub language: &'a str,
    pub author: &'a str,
    pub dates: &'a str,
    pub chapter: &'a str,
    pub verse: i64,
    pub passage: &'a str,
    pub link: &'a str,
}

impl<'a> From<&'a Record> for NewLatinText<'a> {
    fn from(r: &'a Record) -> Self {
        NewLatinText {
            title: &r.title,
            book: &r.book,
            language: &r.language,
            author: &r.author,
            dates: &r.dates,
            chapter: r.chapter.as_str(),
            verse: i64::from(r.verse),
            passage: &r.passage,
            link: &r.link,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, PartialEq)]
#[diesel(table_name = latin_text)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LatinText {
    pub title: String,
    pub book: String,
    pub language: String,
    pub author: String,
    pub dates: String,
    pub chapter: String,
    pub verse: i64,
    pub passage: String,
    pub link: String,
}

impl LatinText {
    pub fn chapter(&self) -> Chapter {
        Chapter::named(&self.chapter)
    }
}
