// Synthetic pages shaped like the four mirrored collections.
//
// Book counts match the real index pages: 17, 19, 26, 17.

use latin_library_backend::page_source::MemoryPageSource;
use latin_library_backend::URL_ROOT;

#[allow(dead_code)]
pub const CASSIODORUS_BOOKS: usize = 17;
#[allow(dead_code)]
pub const STATIUS_BOOKS: usize = 19;
#[allow(dead_code)]
pub const VERGIL_BOOKS: usize = 26;
#[allow(dead_code)]
pub const SILIUS_BOOKS: usize = 17;

pub fn page(title: &str, body: &str) -> String {
    format!("<html><head><title>{}</title></head><body>{}</body></html>", title, body)
}

fn links(hrefs_and_names: &[(String, String)], trailing: usize) -> String {
    let mut s = String::new();
    for (href, name) in hrefs_and_names {
        s.push_str(&format!("<a href=\"{}\">{}</a>\n", href, name));
    }
    for n in 0..trailing {
        s.push_str(&format!("<a href=\"admin{}.html\">The Latin Library</a>\n", n));
    }
    s
}

/// Body text laid out as whole-page lines. The page title is the first
/// line, so eight head lines make nine lines before the verses.
fn document_lines(verses: &[&str], tail_lines: usize, verse_separator: &str) -> String {
    let head: String = (1..=8).map(|n| format!("\nhead line {}", n)).collect();
    let tail: String = (1..=tail_lines).map(|n| format!("\ntail line {}", n)).collect();
    format!("{}\n{}{}", head, verses.join(verse_separator), tail)
}

fn insert_pages(source: &mut MemoryPageSource, index_title: &str, slug: &str, books: Vec<(String, String, String)>, trailing: usize, index_head: &str) {
    let hrefs_and_names: Vec<(String, String)> = books.iter().map(|(href, name, _)| (href.clone(), name.clone())).collect();
    source.insert(
        &format!("{}{}.html", URL_ROOT, slug),
        page(index_title, &format!("{}\n{}", index_head, links(&hrefs_and_names, trailing))),
    );
    for (href, _, content) in books {
        source.insert(&format!("{}{}", URL_ROOT, href), content);
    }
}

pub fn cassiodorus_book_names() -> Vec<String> {
    let mut names: Vec<String> = (1..=13).map(|n| format!("Variae {}", n)).collect();
    names.extend(["Chronica", "Orationum Reliquiae", "De Anima", "De Musica"].map(String::from));
    names
}

pub fn add_cassiodorus(source: &mut MemoryPageSource) {
    let names = cassiodorus_book_names();
    let mut books: Vec<(String, String, String)> = Vec::new();

    for (i, name) in names.iter().enumerate() {
        let href = format!("cassiodorus/book{}.shtml", i + 1);
        let content = match i {
            14 => page(
                "Cassiodorus: Orationum Reliquiae",
                "<p>CASSIODORI</p><p>ORATIONES</p>\
                 <p><b>ORATIO</b> fragmentum primum</p>\
                 <p> ok </p>\
                 <p>fragmentum secundum</p>\
                 <p>Cassiodorus</p><p>The Latin Library</p>",
            ),
            16 => page(
                "Cassiodorus: De Musica",
                "<p>CASSIODORI</p><p>DE MVSICA</p>\
                 <p><b>De Musica</b></p>\
                 <p>Praefatio brevis 1. Musica est scientia 2. bene modulandi</p>\
                 <p>Cassiodorus</p><p>The Latin Library</p>",
            ),
            _ => page(
                &format!("Cassiodorus: {}", name),
                "<p>CASSIODORI</p><p>VARIAE</p>\
                 <p><b>I. Universis</b></p>\
                 <p>Prima sententia [2] secunda sententia [3] tertia\nsententia</p>\
                 <p>  x  </p>\
                 <p>quarta sententia longior</p>\
                 <p><b>II. Regi</b></p>\
                 <p>[1] quinta sententia</p>\
                 <p>Cassiodorus</p><p>The Latin Library</p>",
            ),
        };
        // Books past the first thirteen keep the link text as their name.
        let link_name = if i < 13 { format!("Liber {}", i + 1) } else { name.clone() };
        books.push((href, link_name, content));
    }

    insert_pages(
        source,
        "Cassiodorus",
        "cassiodorus",
        books,
        3,
        "<p class=\"pagehead\">MAGNVS AVRELIVS CASSIODORVS\n(c. 485 - c. 585)</p>",
    );
}

pub fn statius_book_names() -> Vec<String> {
    let mut names: Vec<String> = (1..=12).map(|n| format!("Thebaid {}", n)).collect();
    names.extend((1..=5).map(|n| format!("Silvae {}", n)));
    names.extend((1..=2).map(|n| format!("Achilleid {}", n)));
    names
}

pub fn add_statius(source: &mut MemoryPageSource) {
    let names = statius_book_names();
    let mut books: Vec<(String, String, String)> = Vec::new();

    for (i, name) in names.iter().enumerate() {
        let href = format!("statius/book{}.shtml", i + 1);
        let title = format!("Statius: {}", name);
        let content = match i {
            12..=16 => {
                let poem = if i == 13 || i == 16 {
                    "<p><br>Summa deum, Arcadii fecunda sententia<br>Hic nitor et versus<br></p>"
                } else {
                    "<p>\nSumma deum, Arcadii fecunda sententia\nHic nitor et versus\n</p>"
                };
                page(
                    &title,
                    &format!(
                        "<p>P. PAPINI STATI</p><p>SILVAE</p>\
                         <p>PRAEFATIO</p>\
                         <p>Statius Stellae suo salutem. Diu multumque dubitavi</p>\
                         <p><b>I. ECLOGA</b></p>{}\
                         <p>The Latin Library</p>",
                        poem
                    ),
                )
            }
            _ => page(
                &title,
                "<p>P. PAPINI STATI</p><p>THEBAIS</p>\
                 <p>\nFraternas acies alternaque regna profanis\n\
                 decertata odiis sontesque evolvere Thebas,\n\
                 Pierius menti calor incidit. unde iubetis 3\n\
                 ire, deae?\n</p>\
                 <p>The Latin Library</p>",
            ),
        };
        books.push((href, format!("Liber {}", i + 1), content));
    }

    insert_pages(
        source,
        "Statius",
        "statius",
        books,
        2,
        "<h1>P. PAPINIVS STATIVS</h1><h1 class=\"date\">(c. 45 - c. 96 A.D.)</h1>",
    );
}

pub fn vergil_book_names() -> Vec<String> {
    let mut names: Vec<String> = (1..=10).map(|n| format!("Ecloga {}", n)).collect();
    names.extend((1..=4).map(|n| format!("Georgicon {}", n)));
    names.extend((1..=12).map(|n| format!("Aeneid {}", n)));
    names
}

pub fn add_vergil(source: &mut MemoryPageSource) {
    let verses = [
        "            Meliboeus Tityre, tu patulae recubans sub tegmine fagi",
        "silvestrem tenui Musam meditaris avena;",
        "nos patriae finis et dulcia linquimus arva. 3",
    ];

    let mut books: Vec<(String, String, String)> = Vec::new();
    for i in 0..VERGIL_BOOKS {
        let href = format!("vergil/book{}.shtml", i + 1);
        // Georgics are linked as "Liber n".
        let link_name = match i {
            0..=9 => format!("Ecloga {}", i + 1),
            10..=13 => format!("Liber {}", i - 9),
            _ => format!("Aeneid {}", i - 13),
        };
        let separator = if (16..=21).contains(&i) || i == 24 || i == 25 { "<br>" } else { "\n" };
        let content = page(&format!("Vergil: {}", link_name), &document_lines(&verses, 5, separator));
        books.push((href, link_name, content));
    }

    insert_pages(
        source,
        "Vergil",
        "verg",
        books,
        2,
        "<h1>P. VERGILIVS MARO</h1><h2>(70 - 19 B.C.)</h2>",
    );
}

pub fn add_silius(source: &mut MemoryPageSource) {
    let mut books: Vec<(String, String, String)> = Vec::new();
    for i in 0..SILIUS_BOOKS {
        let href = format!("silius/book{}.shtml", i + 1);
        let verses: Vec<&str> = if i == 15 || i == 16 {
            vec![
                "Ordior arma, quibus caelo se gloria tollit",
                "Aeneadum, patiturque ferox Oenotria iura",
                "Carthago.",
                "10",
                "da, Musa, decus memorare laborum",
            ]
        } else {
            vec![
                "Ordior arma, quibus caelo se gloria tollit",
                "Aeneadum, patiturque ferox Oenotria iura",
                "Carthago. 10",
                "da, Musa, decus memorare laborum",
            ]
        };
        let content = page(&format!("Silius Italicus: Punica {}", i + 1), &document_lines(&verses, 6, "\n"));
        books.push((href, format!("Liber {}", i + 1), content));
    }

    insert_pages(
        source,
        "Silius Italicus",
        "silius",
        books,
        2,
        "<h1>TITVS CATIVS SILIVS ITALICVS</h1><h2>(c. 26 - c. 102 A.D.)</h2>",
    );
}

/// All four collections.
pub fn synthetic_corpus() -> MemoryPageSource {
    let mut source = MemoryPageSource::new();
    add_cassiodorus(&mut source);
    add_statius(&mut source);
    add_vergil(&mut source);
    add_silius(&mut source);
    source
}
