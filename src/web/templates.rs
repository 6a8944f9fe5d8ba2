//! HTML rendering for the web UI

use std::fmt::Write;

use crate::display::transaction::task_glyph;
use crate::models::Transaction;

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto}\
section{border:1px solid #ccc;padding:0.5rem 1rem;margin-bottom:1rem}\
li.done{color:#777;text-decoration:line-through}\
form.inline{display:inline}";

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the index page listing every transaction
pub fn render_index<'a, I>(transactions: I) -> String
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut body = String::new();

    body.push_str(
        "<h2>New transaction</h2>\n\
         <form method=\"post\" action=\"/create\">\n\
         <input name=\"address\" placeholder=\"Property address\" required>\n\
         <input name=\"closing_date\" type=\"date\" required>\n\
         <button type=\"submit\">Create</button>\n\
         </form>\n\
         <h2>Transactions</h2>\n",
    );

    let mut any = false;
    for txn in transactions {
        any = true;
        render_transaction(&mut body, txn);
    }
    if !any {
        body.push_str("<p>No transactions yet.</p>\n");
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Closing Desk</title>\n<style>{}</style>\n</head>\n\
         <body>\n<h1>Closing Desk</h1>\n{}</body>\n</html>\n",
        STYLE, body
    )
}

fn render_transaction(out: &mut String, txn: &Transaction) {
    let id = escape_html(txn.id.as_str());
    // Ids are arbitrary keys; encode them as a single path segment
    let segment = urlencoding::encode(txn.id.as_str());

    // Writing into a String cannot fail
    let _ = writeln!(
        out,
        "<section>\n<h3>{}</h3>\n<p>Closing {} &middot; {} open &middot; <small>{}</small></p>",
        escape_html(&txn.property_address),
        escape_html(&txn.closing_date),
        txn.open_task_count(),
        id
    );

    out.push_str("<ul>\n");
    for (index, task) in txn.tasks.iter().enumerate() {
        let class = if task.completed { " class=\"done\"" } else { "" };
        let _ = write!(
            out,
            "<li{}>{} {} (due {})",
            class,
            task_glyph(task),
            escape_html(&task.description),
            escape_html(&task.due_date)
        );
        if !task.completed {
            let _ = write!(
                out,
                " <form class=\"inline\" method=\"post\" action=\"/{}/{}/complete\">\
                 <button type=\"submit\">Complete</button></form>",
                segment, index
            );
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");

    let _ = writeln!(
        out,
        "<form method=\"post\" action=\"/{}/add-task\">\n\
         <input name=\"description\" placeholder=\"New task\" required>\n\
         <input name=\"due_date\" type=\"date\" required>\n\
         <button type=\"submit\">Add task</button>\n\
         </form>\n</section>",
        segment
    );
}
