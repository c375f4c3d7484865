use time::Date;

use crate::domain::task::Task;
use crate::usecase::overdue::is_overdue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Notice,
    Error,
}

/// One-shot message shown at the top of the list page after a redirect.
#[derive(Debug, Clone)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

impl Banner {
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Notice,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            text: text.into(),
        }
    }
}

const STYLE: &str = "\
:root { color-scheme: light dark; }
body { font-family: system-ui, sans-serif; margin: 0; }
main { max-width: 40rem; margin: 2rem auto; padding: 0 1rem; }
h1 { font-size: 1.4rem; }
.banner { padding: .5rem .75rem; border-radius: .25rem; }
.banner.notice { background: #e7f5e7; color: #1d4d1d; }
.banner.error { background: #fbe3e4; color: #8a1f11; }
form.add { display: flex; gap: .5rem; margin: 1rem 0; flex-wrap: wrap; }
form.add input[name=title] { flex: 1 1 12rem; }
ul.tasks { list-style: none; padding: 0; }
ul.tasks li { display: flex; align-items: baseline; gap: .5rem; padding: .35rem 0; border-bottom: 1px solid #8883; }
li.done .title { text-decoration: line-through; opacity: .6; }
.category { font-size: .85rem; background: #8882; border-radius: .75rem; padding: .1rem .6rem; }
.due { font-size: .85rem; opacity: .8; }
.due.overdue { color: #b00020; font-weight: 600; opacity: 1; }
li form { display: inline; }
li form.remove { margin-left: auto; }
li button { background: none; border: none; cursor: pointer; font-size: 1rem; }
footer { margin-top: 1.5rem; display: flex; justify-content: space-between; align-items: center; font-size: .9rem; }
";

const ADD_FORM: &str = r#"<form class="add" method="post" action="/tasks">
  <input name="title" placeholder="What needs doing?" autofocus>
  <input name="category" placeholder="category">
  <input name="due_date" type="date" aria-label="due date">
  <button>Add</button>
</form>"#;

pub fn list_page(tasks: &[Task], banner: Option<&Banner>, today: Date) -> String {
    let banner = banner_html(banner);
    let body = if tasks.is_empty() {
        r#"<p class="empty">No tasks yet. Add the first one above.</p>"#.to_string()
    } else {
        let rows: String = tasks.iter().map(|task| task_row(task, today)).collect();
        format!("<ul class=\"tasks\">\n{rows}</ul>")
    };
    let footer = footer_html(tasks);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>fuda</title>
<style>{STYLE}</style>
</head>
<body>
<main>
<h1>fuda</h1>
{banner}{ADD_FORM}
{body}
{footer}
</main>
</body>
</html>
"#
    )
}

fn banner_html(banner: Option<&Banner>) -> String {
    let Some(banner) = banner else {
        return String::new();
    };
    let class = match banner.kind {
        BannerKind::Notice => "notice",
        BannerKind::Error => "error",
    };
    format!(
        "<p class=\"banner {class}\">{}</p>\n",
        escape_html(&banner.text)
    )
}

fn task_row(task: &Task, today: Date) -> String {
    let done_class = if task.done { " done" } else { "" };
    let symbol = if task.done { "✔" } else { "•" };
    let mut row = format!(
        "  <li class=\"task{done_class}\">\n    <form method=\"post\" action=\"/tasks/{id}/toggle\"><button class=\"status\" aria-label=\"toggle\">{symbol}</button></form>\n    <span class=\"title\">{title}</span>\n",
        id = task.id,
        title = escape_html(&task.title),
    );
    if let Some(category) = &task.category {
        row.push_str(&format!(
            "    <span class=\"category\">{}</span>\n",
            escape_html(category)
        ));
    }
    if let Some(due) = &task.due_date {
        if is_overdue(due, today) {
            row.push_str(&format!(
                "    <span class=\"due overdue\">due {} (overdue)</span>\n",
                escape_html(due)
            ));
        } else {
            row.push_str(&format!(
                "    <span class=\"due\">due {}</span>\n",
                escape_html(due)
            ));
        }
    }
    row.push_str(&format!(
        "    <form class=\"remove\" method=\"post\" action=\"/tasks/{}/delete\"><button aria-label=\"delete\">✕</button></form>\n  </li>\n",
        task.id
    ));
    row
}

fn footer_html(tasks: &[Task]) -> String {
    let total = tasks.len();
    let open = total - tasks.iter().filter(|t| t.done).count();
    let mut footer = format!("<footer>\n  <span>Open: {open} / All: {total}</span>\n");
    if open < total {
        footer.push_str(
            "  <form method=\"post\" action=\"/tasks/clear-done\"><button>Clear completed</button></form>\n",
        );
    }
    footer.push_str("</footer>");
    footer
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
