//! Server-rendered pages: login form, search form, results table

use crate::database::CompanyRecord;
use crate::search::{CANDIDATE_POOL_CAP, MAX_RESULTS_CAP};
use crate::config::REQUIRED_COUNTRY;
use crate::server::forms::SearchForm;

/// What to show under the search form
pub enum Outcome<'a> {
  Results(&'a [CompanyRecord]),
  Error(&'a str),
}

pub fn escape(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for c in text.chars() {
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

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 1200px; padding: 0 1rem; }
label { display: block; margin-top: 1rem; font-weight: 600; }
textarea, input[type=text], input[type=password], input[type=number] { width: 100%; padding: .4rem; box-sizing: border-box; }
.row { display: flex; gap: 1rem; }
.row > div { flex: 1; }
button { margin-top: 1rem; padding: .5rem 1rem; }
.notice { padding: .75rem; border-radius: 4px; margin: 1rem 0; }
.error { background: #fde8e8; color: #8a1c1c; }
.info { background: #e8f0fd; color: #1c3f8a; }
table { border-collapse: collapse; width: 100%; margin-top: 1rem; }
th, td { border: 1px solid #ddd; padding: .4rem; text-align: left; vertical-align: top; }
th { background: #f4f4f4; }
header { display: flex; justify-content: space-between; align-items: center; }
"#;

fn page(title: &str, body: &str) -> String {
  format!(
    "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
    escape(title)
  )
}

pub fn login_page(failure: Option<&str>) -> String {
  let notice = failure
    .map(|message| format!("<div class=\"notice error\">{}</div>", escape(message)))
    .unwrap_or_default();

  page(
    "Company Vector Search - Login",
    &format!(
      r#"<h1>Company Vector Search</h1>
{notice}
<form method="post" action="/login">
<label for="password">Password</label>
<input type="password" id="password" name="password" autofocus required>
<button type="submit">Log in</button>
</form>"#
    ),
  )
}

pub fn search_page(form: &SearchForm, outcome: Option<Outcome<'_>>) -> String {
  let results = match outcome {
    None => String::new(),
    Some(Outcome::Error(message)) => {
      format!("<div class=\"notice error\">{}</div>", escape(message))
    }
    Some(Outcome::Results(records)) => results_table(records),
  };

  page(
    "Company Vector Search",
    &format!(
      r#"<header>
<h1>Company Vector Search</h1>
<form method="post" action="/logout"><button type="submit">Log out</button></form>
</header>
<p>Enter a description to find similar companies. All searches are filtered for companies in the <strong>{country}</strong>.</p>
<form method="post" action="/search">
<label for="description">Company description</label>
<textarea id="description" name="description" rows="6" required placeholder="e.g. A cutting-edge artificial intelligence startup specializing in natural language processing...">{description}</textarea>
<h3>Filters</h3>
<label for="industries">Industries (optional, comma-separated)</label>
<input type="text" id="industries" name="industries" value="{industries}" placeholder="e.g. Artificial Intelligence, SaaS">
<h3>Search parameters</h3>
<div class="row">
<div>
<label for="max_results">Max results to fetch</label>
<input type="number" id="max_results" name="max_results" min="1" max="{max_cap}" step="1" value="{max_results}" required>
</div>
<div>
<label for="candidate_pool_size">Candidates to search</label>
<input type="number" id="candidate_pool_size" name="candidate_pool_size" min="1" max="{pool_cap}" step="1" value="{candidates}" required>
</div>
</div>
<button type="submit">Search for similar companies</button>
</form>
<script>
const limit = document.getElementById("max_results");
const pool = document.getElementById("candidate_pool_size");
const syncPoolMin = () => {{ pool.min = limit.value || 1; }};
limit.addEventListener("input", syncPoolMin);
syncPoolMin();
</script>
{results}"#,
      country = escape(REQUIRED_COUNTRY),
      description = escape(&form.description),
      industries = escape(&form.industries),
      max_results = escape(&form.max_results),
      candidates = escape(&form.candidate_pool_size),
      max_cap = MAX_RESULTS_CAP,
      pool_cap = CANDIDATE_POOL_CAP,
    ),
  )
}

fn results_table(records: &[CompanyRecord]) -> String {
  if records.is_empty() {
    return "<div class=\"notice info\">The search did not return any results from the database. Try broadening your criteria.</div>".to_string();
  }

  let rows: String = records
    .iter()
    .map(|record| {
      format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.4}</td></tr>\n",
        escape(&record.name),
        escape(&record.description),
        escape(record.industry.as_deref().unwrap_or("")),
        escape(record.country.as_deref().unwrap_or("")),
        record.score,
      )
    })
    .collect();

  format!(
    "<hr>\n<h2>Search Results: {count} Companies Found</h2>\n<table>\n<thead><tr><th>Company</th><th>Description</th><th>Industry</th><th>Country</th><th>Score</th></tr></thead>\n<tbody>\n{rows}</tbody>\n</table>",
    count = records.len()
  )
}
