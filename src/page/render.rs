//! Server-side HTML rendering
//!
//! One self-contained document: themed CSS, Plotly.js from the CDN, every
//! figure inlined as a JSON script block, and a small script wiring tabs
//! and dropdowns.

use std::fmt::Write;

use rustc_hash::FxHashMap;

use super::{Dropdown, FigureSource, Node, Page, Section, Tabs};
use crate::charts::{DataTable, Theme};
use crate::figure::Figure;
use crate::Result;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.0.min.js";

const SCRIPT: &str = r"
document.querySelectorAll('script[data-graph]').forEach(s => {
  const fig = JSON.parse(s.textContent);
  Plotly.newPlot(s.dataset.graph, fig.data, fig.layout, {responsive: true});
});
document.querySelectorAll('.tab-bar').forEach(bar => {
  bar.addEventListener('click', e => {
    const button = e.target.closest('button.tab');
    if (!button || button.parentElement !== bar) return;
    bar.querySelectorAll(':scope > button.tab').forEach(b => {
      const selected = b === button;
      b.classList.toggle('selected', selected);
      document.getElementById(b.dataset.target).hidden = !selected;
    });
    document.getElementById(button.dataset.target)
      .querySelectorAll('.graph')
      .forEach(g => Plotly.Plots.resize(g));
  });
});
document.querySelectorAll('select[data-endpoint]').forEach(select => {
  select.addEventListener('change', () => {
    fetch(select.dataset.endpoint + '?value=' + encodeURIComponent(select.value))
      .then(r => r.ok ? r.json() : Promise.reject(new Error(r.status + ' ' + r.statusText)))
      .then(fig => Plotly.react(select.dataset.graph, fig.data, fig.layout))
      .catch(err => console.error(err));
  });
});
";

/// Escape text for HTML element content and quoted attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Figure JSON safe to place inside a `<script>` element.
fn script_json(figure: &Figure) -> Result<String> {
    Ok(figure.to_json()?.replace("</", "<\\/"))
}

/// Render the page to a complete HTML document.
///
/// Dropdown-driven graphs start with the figure of the dropdown's selected
/// value, or an empty figure when the dropdown has no options.
///
/// # Errors
///
/// Returns `UnknownFigure` if a graph slot has no figure, or
/// `UnknownCohort` if a dropdown's selected value has none.
pub fn render_html<S: FigureSource>(page: &Page, theme: &Theme, source: &S) -> Result<String> {
    let mut initial = FxHashMap::default();
    for dropdown in page.dropdowns() {
        let figure = if dropdown.options.is_empty() {
            Figure::new()
        } else {
            source.callback(dropdown.callback, &dropdown.value)?.clone()
        };
        initial.insert(dropdown.graph_id(), script_json(&theme.themed(figure))?);
    }

    let mut renderer = Renderer {
        out: String::with_capacity(256 * 1024),
        source,
        initial,
    };
    renderer.document(page, theme)?;
    Ok(renderer.out)
}

struct Renderer<'a, S> {
    out: String,
    source: &'a S,
    initial: FxHashMap<&'static str, String>,
}

impl<S: FigureSource> Renderer<'_, S> {
    fn document(&mut self, page: &Page, theme: &Theme) -> Result<()> {
        let title = escape_html(&page.title);
        writeln!(self.out, "<!DOCTYPE html>")?;
        writeln!(self.out, "<html lang=\"en\">\n<head>")?;
        writeln!(self.out, "<meta charset=\"utf-8\">")?;
        writeln!(self.out, "<title>{title}</title>")?;
        writeln!(self.out, "<script src=\"{PLOTLY_CDN}\"></script>")?;
        writeln!(self.out, "<style>{}</style>", css(theme))?;
        writeln!(self.out, "</head>\n<body>\n<div id=\"app\">")?;
        writeln!(self.out, "<h1>{title}</h1>")?;
        for section in &page.sections {
            self.section(section)?;
        }
        writeln!(self.out, "</div>\n<script>{SCRIPT}</script>\n</body>\n</html>")?;
        Ok(())
    }

    fn section(&mut self, section: &Section) -> Result<()> {
        writeln!(self.out, "<div class=\"section\" id=\"{}\">", section.id)?;
        writeln!(self.out, "<h2>{}</h2>", escape_html(section.title))?;
        self.nodes(&section.body)?;
        writeln!(self.out, "</div>")?;
        Ok(())
    }

    fn nodes(&mut self, nodes: &[Node]) -> Result<()> {
        for node in nodes {
            match node {
                Node::Graph(id) => self.graph(id)?,
                Node::Dropdown(dropdown) => self.dropdown(dropdown)?,
                Node::Table(table) => self.table(table)?,
                Node::Tabs(tabs) => self.tabs(tabs)?,
            }
        }
        Ok(())
    }

    fn graph(&mut self, id: &str) -> Result<()> {
        let json = match self.initial.get(id) {
            Some(json) => json.clone(),
            None => script_json(self.source.figure(id)?)?,
        };
        writeln!(self.out, "<div class=\"graph\" id=\"{id}\"></div>")?;
        writeln!(
            self.out,
            "<script type=\"application/json\" data-graph=\"{id}\">{json}</script>"
        )?;
        Ok(())
    }

    fn dropdown(&mut self, dropdown: &Dropdown) -> Result<()> {
        writeln!(
            self.out,
            "<select id=\"{}\" data-endpoint=\"{}\" data-graph=\"{}\">",
            dropdown.id(),
            dropdown.callback.path(),
            dropdown.graph_id()
        )?;
        for option in &dropdown.options {
            let selected = if *option == dropdown.value {
                " selected"
            } else {
                ""
            };
            let option = escape_html(option);
            writeln!(self.out, "<option value=\"{option}\"{selected}>{option}</option>")?;
        }
        writeln!(self.out, "</select>")?;
        Ok(())
    }

    fn table(&mut self, table: &DataTable) -> Result<()> {
        writeln!(self.out, "<div class=\"data-table\">\n<table>\n<thead><tr>")?;
        for column in table.columns() {
            write!(self.out, "<th>{}</th>", escape_html(column))?;
        }
        writeln!(self.out, "</tr></thead>\n<tbody>")?;
        for row in table.rows() {
            write!(self.out, "<tr>")?;
            for cell in row {
                write!(self.out, "<td>{}</td>", escape_html(cell))?;
            }
            writeln!(self.out, "</tr>")?;
        }
        writeln!(self.out, "</tbody>\n</table>\n</div>")?;
        Ok(())
    }

    fn tabs(&mut self, tabs: &Tabs) -> Result<()> {
        writeln!(self.out, "<div class=\"tabs\" id=\"{}\">", tabs.id)?;
        writeln!(self.out, "<div class=\"tab-bar\">")?;
        for (i, tab) in tabs.tabs.iter().enumerate() {
            let class = if i == 0 { "tab selected" } else { "tab" };
            writeln!(
                self.out,
                "<button class=\"{class}\" data-target=\"{}\">{}</button>",
                tab.id,
                escape_html(tab.label)
            )?;
        }
        writeln!(self.out, "</div>")?;
        for (i, tab) in tabs.tabs.iter().enumerate() {
            let hidden = if i == 0 { "" } else { " hidden" };
            writeln!(self.out, "<div class=\"tab-panel\" id=\"{}\"{hidden}>", tab.id)?;
            self.nodes(&tab.children)?;
            writeln!(self.out, "</div>")?;
        }
        writeln!(self.out, "</div>")?;
        Ok(())
    }
}

fn css(theme: &Theme) -> String {
    format!(
        "
body{{margin:0;background:{bg};color:{text};font-family:sans-serif}}
#app{{padding:12px 24px;background:{bg};color:{text}}}
.section{{margin-bottom:32px}}
.tab-bar{{display:flex;border-bottom:1px solid {tab_bg}}}
.tab{{flex:1;padding:8px;background:{bg};color:{text};border:1px solid #333;cursor:pointer}}
.tab.selected{{background:{tab_bg};color:{tab_text}}}
.graph{{min-height:450px}}
select{{margin:12px 0;padding:4px;background:{plot_bg};color:{text}}}
.data-table{{max-height:400px;min-width:1200px;overflow:auto}}
.data-table table{{border-collapse:collapse;font-size:12px}}
.data-table th{{position:sticky;top:0;background:{tab_bg};color:{tab_text}}}
.data-table th,.data-table td{{padding:4px 8px;border:1px solid #333;white-space:nowrap}}
",
        bg = theme.background,
        plot_bg = theme.plot_background,
        text = theme.text,
        tab_bg = theme.tab_background,
        tab_text = theme.tab_text,
    )
}
