//! Walk-through: seed a store, then run a cross-entity search.

use anyhow::Result;

use bookmark_vault::{
    bookmarks, categories, db, notes, search, snippets, tags, NewBookmark, NewCodeSnippet,
    NewNote, NewTag,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut conn = db::open("bookmarks.db")?;

    let bookmark = bookmarks::create(
        &mut conn,
        &NewBookmark {
            title: "OWASP Top 10 Web Application Security Risks".into(),
            url: "https://owasp.org/www-project-top-ten/".into(),
            description: Some(
                "Standard awareness document for web application security".into(),
            ),
        },
    )?;
    println!("created bookmark #{}: {}", bookmark.id, bookmark.title);

    if let Some(category) = categories::get_by_name(&conn, "Web Security")? {
        bookmarks::add_category(&conn, bookmark.id, category.id)?;
    }

    let tag = match tags::get_by_name(&conn, "owasp")? {
        Some(tag) => tag,
        None => tags::create(
            &conn,
            &NewTag {
                name: "owasp".into(),
                color: Some("#FF5733".into()),
            },
        )?,
    };
    bookmarks::add_tag(&conn, bookmark.id, tag.id)?;

    notes::create(
        &mut conn,
        &NewNote {
            bookmark_id: bookmark.id,
            content: "Injection is still near the top of the list; review the cheat sheets \
                      quarterly."
                .into(),
        },
    )?;

    snippets::create(
        &mut conn,
        &NewCodeSnippet {
            bookmark_id: bookmark.id,
            language: "javascript".into(),
            code: "const clean = DOMPurify.sanitize(userInput);".into(),
            description: Some("XSS prevention with DOMPurify".into()),
        },
    )?;

    let hits = search::search_all(&conn, "injection", 10)?;
    println!("search \"injection\" -> {} hit(s)", hits.len());
    for hit in &hits {
        println!("{}", serde_json::to_string(hit)?);
    }

    Ok(())
}
