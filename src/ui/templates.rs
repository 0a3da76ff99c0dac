//! HTML rendering of the console pages
//!
//! Simple inline HTML templates without a template engine. Pages are built from
//! the form and grid models held by the session's presenters.

use crate::database::models::{Project, Role, User};
use crate::schema::Entity;
use crate::ui::editor::{EditorEvent, FormView, Input, Widget};
use crate::ui::list::{GridView, ListView};
use crate::ui::messages::Messages;
use crate::ui::session::{Console, Managed};

/// Theme shared by every page
const COMMON_STYLES: &str = r#"
    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
        margin: 0;
        background: #f5f5f5;
        color: #333;
    }
    .topbar {
        display: flex;
        align-items: center;
        gap: 12px;
        padding: 10px 24px;
        background: #1f3a5f;
        color: white;
    }
    .topbar .logo {
        font-weight: bold;
        font-size: 18px;
        margin-right: 24px;
    }
    .topbar a {
        color: white;
        text-decoration: none;
        padding: 6px 12px;
        border-radius: 4px;
    }
    .topbar a.active, .topbar a:hover {
        background: rgba(255,255,255,0.2);
    }
    .topbar .spacer {
        flex: 1;
    }
    .container {
        max-width: 1000px;
        margin: 30px auto;
        background: white;
        padding: 30px;
        border-radius: 8px;
        box-shadow: 0 2px 4px rgba(0,0,0,0.1);
    }
    .toolbar {
        display: flex;
        gap: 8px;
        margin-bottom: 16px;
    }
    table {
        width: 100%;
        border-collapse: collapse;
    }
    th, td {
        text-align: left;
        padding: 8px;
        border-bottom: 1px solid #ddd;
    }
    tr.selected {
        background: #e6f0ff;
    }
    .form-group {
        margin-bottom: 14px;
    }
    .form-group label {
        display: block;
        font-weight: 600;
        margin-bottom: 4px;
    }
    input, select {
        padding: 7px;
        border: 1px solid #ccc;
        border-radius: 4px;
        box-sizing: border-box;
    }
    .form-group input, .form-group select {
        width: 100%;
    }
    button, .button {
        background: #0066cc;
        color: white;
        border: none;
        padding: 8px 16px;
        border-radius: 4px;
        cursor: pointer;
        text-decoration: none;
        font-size: 14px;
    }
    button.secondary {
        background: #888;
    }
    button.danger {
        background: #cc3333;
    }
    .overlay {
        position: fixed;
        inset: 0;
        background: rgba(0,0,0,0.4);
        display: flex;
        align-items: center;
        justify-content: center;
    }
    .window {
        background: white;
        padding: 24px;
        border-radius: 8px;
        min-width: 420px;
        box-shadow: 0 4px 12px rgba(0,0,0,0.3);
    }
    .actions {
        display: flex;
        gap: 8px;
        justify-content: flex-end;
    }
    .error {
        color: #cc3333;
        background: #fee;
        padding: 10px;
        border-radius: 4px;
        margin-bottom: 16px;
    }
"#;

/// Screens listed in the navigation bar, in display order
fn navigation() -> [(&'static str, &'static str); 3] {
    [
        (User::TABLE, User::NAVIGATION_KEY),
        (Project::TABLE, Project::NAVIGATION_KEY),
        (Role::TABLE, Role::NAVIGATION_KEY),
    ]
}

fn page(app_title: &str, heading: &str, topbar: &str, body: &str) -> String {
    let app_title = html_escape(app_title);
    let heading = html_escape(heading);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{app_title} - {heading}</title>
    <style>{COMMON_STYLES}</style>
</head>
<body>
    {topbar}
    {body}
</body>
</html>"#
    )
}

fn topbar(app_title: &str, messages: &Messages, active: Option<&str>, username: Option<&str>) -> String {
    let links: String = navigation()
        .iter()
        .map(|(table, key)| {
            let class = if Some(*table) == active { r#" class="active""# } else { "" };
            format!(
                r#"<a href="/{table}"{class}>{}</a>"#,
                html_escape(&messages.get(key))
            )
        })
        .collect();

    let account = match username {
        Some(name) => format!(
            r#"<span>{}</span>
        <form method="POST" action="/logout"><button type="submit" class="secondary">{}</button></form>"#,
            html_escape(name),
            html_escape(&messages.get("logoutButtonLabel"))
        ),
        None => String::new(),
    };

    format!(
        r#"<div class="topbar">
        <span class="logo">{}</span>
        {links}
        <span class="spacer"></span>
        {account}
    </div>"#,
        html_escape(app_title)
    )
}

/// Render the list screen of `E`, including the editor window when it is open
pub fn entity_page<E: Managed>(
    app_title: &str,
    messages: &Messages,
    username: Option<&str>,
    console: &Console<E>,
) -> String {
    let heading = messages.get(E::NAVIGATION_KEY);
    let list = grid(messages, console.view());

    let editor = console.editor().view();
    let window = if editor.is_visible() {
        editor_window::<E>(editor)
    } else {
        String::new()
    };
    let dialog = match editor.prompt() {
        Some(prompt) => confirm_dialog::<E>(&prompt.title, &prompt.message, editor),
        None => String::new(),
    };

    let body = format!(
        r#"<div class="container">
        <h1>{}</h1>
        {list}
    </div>
    {window}
    {dialog}"#,
        html_escape(&heading)
    );

    page(
        app_title,
        &heading,
        &topbar(app_title, messages, Some(E::TABLE), username),
        &body,
    )
}

fn grid<E: Entity>(messages: &Messages, grid: &GridView<E>) -> String {
    let table = E::TABLE;
    let filter = html_escape(grid.filter());
    let placeholder = html_escape(&messages.get("filterPlaceholder"));
    let filter_label = html_escape(&messages.get("filterButtonLabel"));
    let add_label = html_escape(&messages.get("addNewButtonLabel"));

    let header: String = grid
        .columns()
        .iter()
        .map(|c| format!("<th>{}</th>", html_escape(&c.label)))
        .collect();

    let rows: String = grid
        .items()
        .iter()
        .filter_map(|entity| {
            let id = entity.id()?;
            let class = if grid.selected() == Some(id) { r#" class="selected""# } else { "" };
            let cells: String = grid
                .cells(entity)
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    if i == 0 {
                        format!(
                            r#"<td><a href="/{table}/{id}/edit">{}</a></td>"#,
                            html_escape(cell)
                        )
                    } else {
                        format!("<td>{}</td>", html_escape(cell))
                    }
                })
                .collect();
            Some(format!("<tr{class}>{cells}</tr>"))
        })
        .collect();

    format!(
        r#"<div class="toolbar">
            <form method="GET" action="/{table}">
                <input type="text" name="filter" value="{filter}" placeholder="{placeholder}">
                <button type="submit">{filter_label}</button>
            </form>
            <form method="GET" action="/{table}/new">
                <button type="submit">{add_label}</button>
            </form>
        </div>
        <table>
            <thead><tr>{header}</tr></thead>
            <tbody>{rows}</tbody>
        </table>"#
    )
}

fn editor_window<E: Entity>(view: &FormView<E>) -> String {
    let table = E::TABLE;
    let fields: String = view.widgets().iter().map(widget).collect();
    let actions = view.actions();

    let autofocus = if view.focused() == Some(EditorEvent::Save) { " autofocus" } else { "" };
    let delete = if view.is_delete_visible() {
        format!(
            r#"<button type="submit" name="action" value="delete" class="danger">{}</button>"#,
            html_escape(&actions.delete)
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="overlay">
        <div class="window">
            <form method="POST" action="/{table}/editor">
                {fields}
                <div class="actions">
                    {delete}
                    <button type="submit" name="action" value="cancel" class="secondary" formnovalidate>{}</button>
                    <button type="submit" name="action" value="save"{autofocus}>{}</button>
                </div>
            </form>
        </div>
    </div>"#,
        html_escape(&actions.cancel),
        html_escape(&actions.save)
    )
}

fn widget(widget: &Widget) -> String {
    let name = widget.name;
    let label = html_escape(&widget.label);
    let value = html_escape(&widget.value);

    let input = match &widget.input {
        Input::Text => format!(r#"<input type="text" id="{name}" name="{name}" value="{value}">"#),
        Input::Masked => format!(r#"<input type="password" id="{name}" name="{name}" value="{value}">"#),
        Input::Select { choices } => {
            let options: String = choices
                .iter()
                .map(|choice| {
                    let selected = if *choice == widget.value { " selected" } else { "" };
                    format!(r#"<option value="{choice}"{selected}>{choice}</option>"#)
                })
                .collect();
            format!(r#"<select id="{name}" name="{name}">{options}</select>"#)
        }
    };

    format!(
        r#"<div class="form-group">
                    <label for="{name}">{label}</label>
                    {input}
                </div>"#
    )
}

fn confirm_dialog<E: Entity>(title: &str, message: &str, view: &FormView<E>) -> String {
    let table = E::TABLE;
    let actions = view.actions();
    format!(
        r#"<div class="overlay">
        <div class="window">
            <h2>{}</h2>
            <p>{}</p>
            <form method="POST" action="/{table}/editor" class="actions">
                <button type="submit" name="action" value="dismiss-delete" class="secondary">{}</button>
                <button type="submit" name="action" value="confirm-delete" class="danger" autofocus>{}</button>
            </form>
        </div>
    </div>"#,
        html_escape(title),
        html_escape(message),
        html_escape(&actions.confirm_cancel),
        html_escape(&actions.confirm_ok)
    )
}

/// Render the login page
pub fn login_page(app_title: &str, messages: &Messages, error: Option<&str>) -> String {
    let error_html = error.map_or(String::new(), |e| {
        format!(r#"<div class="error">{}</div>"#, html_escape(e))
    });
    let title = messages.get("loginTitle");

    let body = format!(
        r#"<div class="container">
        <h1>{}</h1>
        {error_html}
        <form method="POST" action="/login">
            <div class="form-group">
                <label for="username">{}</label>
                <input type="text" id="username" name="username" required autofocus>
            </div>
            <div class="form-group">
                <label for="password">{}</label>
                <input type="password" id="password" name="password">
            </div>
            <button type="submit">{}</button>
        </form>
    </div>"#,
        html_escape(&title),
        html_escape(&messages.get("usernameFieldLabel")),
        html_escape(&messages.get("passwordFieldLabel")),
        html_escape(&messages.get("loginButtonLabel"))
    );

    page(app_title, &title, &topbar(app_title, messages, None, None), &body)
}

/// Render the generic error view
pub fn error_page(app_title: &str, messages: &Messages, detail: Option<&str>) -> String {
    let heading = messages.get("errorHappened");
    let detail_html = detail.map_or(String::new(), |d| format!("<p>{}</p>", html_escape(d)));

    let body = format!(
        r#"<div class="container">
        <h1>{}</h1>
        {detail_html}
        <p><a href="/">&larr;</a></p>
    </div>"#,
        html_escape(&heading)
    );

    page(app_title, &heading, &topbar(app_title, messages, None, None), &body)
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
