use crate::calendar::{MonthGrid, WEEKDAY_HEADERS};
use crate::form::ActivityForm;
use crate::models::{Activity, ActivityType, StatsResponse, Tab};
use chrono::{Datelike, NaiveDate};
use std::fmt::Write;

const SHORT_MONTHS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Everything the page needs for one render.
pub struct PageView<'a> {
    pub today: NaiveDate,
    pub stats: StatsResponse,
    pub insight: &'a str,
    pub insight_loading: bool,
    pub active_tab: Tab,
    pub grid: MonthGrid,
    pub form: &'a ActivityForm,
    pub recent: Vec<Activity>,
}

pub fn render_index(view: &PageView<'_>) -> String {
    let (calendar_class, form_class) = match view.active_tab {
        Tab::Calendar => ("tab active", "tab"),
        Tab::Form => ("tab", "tab active"),
    };
    let body = match view.active_tab {
        Tab::Calendar => format!(
            "{}{}",
            render_calendar(&view.grid),
            render_recent(&view.recent)
        ),
        Tab::Form => render_form(view.form),
    };

    INDEX_HTML
        .replace(
            "{{TODAY}}",
            &format!(
                "{:02} de {}.",
                view.today.day(),
                SHORT_MONTHS[view.today.month0() as usize]
            ),
        )
        .replace("{{COUNT}}", &view.stats.count.to_string())
        .replace("{{MINUTES}}", &view.stats.total_duration.to_string())
        .replace("{{KM}}", &format!("{:.1}", view.stats.total_distance))
        .replace("{{INSIGHT}}", &render_insight(view.insight, view.insight_loading))
        .replace("{{CALENDAR_TAB}}", calendar_class)
        .replace("{{FORM_TAB}}", form_class)
        .replace("{{BODY}}", &body)
}

fn render_insight(insight: &str, loading: bool) -> String {
    if insight.is_empty() {
        let label = if loading { "Analisando..." } else { "Gerar Insight IA" };
        let disabled = if loading { " disabled" } else { "" };
        return format!(
            r#"<p class="muted">Clique para receber seu feedback personalizado!</p>
      <form method="post" action="/insight/refresh"><button class="btn-soft" type="submit"{disabled}>{label}</button></form>"#
        );
    }

    let mut html = format!(r#"<p class="insight-text">"{}"</p>"#, escape_html(insight));
    if loading {
        html.push_str(r#"<div class="insight-overlay">Atualizando insights...</div>"#);
    } else {
        html.push_str(
            r#"<form method="post" action="/insight/refresh" class="insight-refresh"><button class="link" type="submit">Atualizar</button></form>"#,
        );
    }
    html
}

fn render_calendar(grid: &MonthGrid) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<section class="card">
      <div class="calendar-head">
        <h3>{}</h3>
        <div class="nav">
          <form method="post" action="/calendar/prev"><button class="round" type="submit" aria-label="Mês anterior">&lsaquo;</button></form>
          <form method="post" action="/calendar/next"><button class="round" type="submit" aria-label="Próximo mês">&rsaquo;</button></form>
        </div>
      </div>
      <div class="grid weekdays">"#,
        escape_html(&grid.title)
    );
    for weekday in WEEKDAY_HEADERS {
        let _ = write!(html, "<div>{weekday}</div>");
    }
    html.push_str(r#"</div><div class="grid">"#);

    for _ in 0..grid.leading_blanks {
        html.push_str(r#"<div class="cell blank"></div>"#);
    }
    for day in &grid.days {
        let class = if day.activities.is_empty() { "cell" } else { "cell busy" };
        let _ = write!(
            html,
            r#"<div class="{class}"><span class="day">{}</span>"#,
            day.date.day()
        );
        for label in day.labels() {
            let _ = write!(html, r#"<span class="chip">{label}</span>"#);
        }
        if day.overflow() > 0 {
            let _ = write!(html, r#"<span class="more">+{} mais</span>"#, day.overflow());
        }
        html.push_str("</div>");
    }
    html.push_str("</div></section>");
    html
}

fn render_recent(recent: &[Activity]) -> String {
    if recent.is_empty() {
        return String::new();
    }

    let mut html = String::from(
        r#"<section class="history">
      <div class="history-head"><h3>Histórico Recente</h3><span class="muted">Clique para excluir</span></div>"#,
    );
    for activity in recent {
        let distance = match activity.distance {
            Some(km) if km != 0.0 => format!(r#"<span class="muted">{km} km</span>"#),
            _ => String::new(),
        };
        let _ = write!(
            html,
            r#"<div class="entry">
        <div><strong>{label}</strong><span class="muted">{date}</span></div>
        <div class="entry-side">
          <div><strong>{duration} min</strong>{distance}</div>
          <form method="post" action="/activities/{id}/delete" onsubmit="return confirm('Deseja excluir este registro permanentemente?');">
            <button class="delete" type="submit" title="Excluir">&times;</button>
          </form>
        </div>
      </div>"#,
            label = activity.activity_type.label(),
            date = activity.date.format("%d/%m/%Y"),
            duration = activity.duration,
            id = escape_html(&activity.id),
        );
    }
    html.push_str("</section>");
    html
}

fn render_form(form: &ActivityForm) -> String {
    let mut options = String::new();
    for activity_type in ActivityType::ALL {
        let selected = if activity_type == form.activity_type { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{}"{selected}>{}</option>"#,
            activity_type.as_str(),
            activity_type.label()
        );
    }

    format!(
        r#"<form class="card" method="post" action="/activities">
      <h3>Registrar Atividade</h3>
      <div class="fields">
        <label>Tipo<select name="type">{options}</select></label>
        <label>Data<input type="date" name="date" value="{date}" /></label>
        <label>Duração (min)<input type="number" name="duration" value="{duration}" placeholder="Ex: 45" required /></label>
        <label>Distância (km - opcional)<input type="number" step="0.1" name="distance" value="{distance}" placeholder="Ex: 5.2" /></label>
      </div>
      <label>Observações<textarea name="notes" placeholder="Como foi o treino?">{notes}</textarea></label>
      <button class="btn-primary" type="submit">Salvar Atividade</button>
    </form>"#,
        date = escape_html(&form.date),
        duration = escape_html(&form.duration),
        distance = escape_html(&form.distance),
        notes = escape_html(&form.notes),
    )
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            // keeps user text from matching a template placeholder
            '{' => escaped.push_str("&#123;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>FitTrack AI</title>
  <style>
    :root {
      --bg: #f8fafc;
      --ink: #1e293b;
      --muted: #64748b;
      --accent: #4f46e5;
      --accent-soft: #eef2ff;
      --card: #ffffff;
      --border: #e2e8f0;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding-bottom: 96px;
    }

    header {
      background: var(--accent);
      color: white;
      padding: 32px 16px 64px;
    }

    .wrap {
      max-width: 880px;
      margin: 0 auto;
    }

    .top {
      display: flex;
      justify-content: space-between;
      align-items: center;
      margin-bottom: 24px;
    }

    h1 {
      margin: 0;
      font-size: 1.9rem;
    }

    .synced {
      font-size: 0.65rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      opacity: 0.8;
    }

    .pill {
      background: rgba(255, 255, 255, 0.2);
      border-radius: 999px;
      padding: 4px 16px;
      font-size: 0.9rem;
    }

    .stats {
      display: grid;
      grid-template-columns: repeat(3, 1fr);
      gap: 16px;
    }

    .stat {
      background: rgba(255, 255, 255, 0.1);
      border-radius: 16px;
      padding: 16px;
    }

    .stat .label {
      display: block;
      font-size: 0.7rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      opacity: 0.8;
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 700;
    }

    main {
      margin-top: -32px;
      padding: 0 16px;
    }

    .card {
      background: var(--card);
      border: 1px solid var(--border);
      border-radius: 18px;
      padding: 24px;
      margin-bottom: 24px;
      position: relative;
    }

    .insight-text {
      font-style: italic;
      color: var(--muted);
      line-height: 1.6;
    }

    .insight-overlay {
      position: absolute;
      inset: 0;
      background: rgba(255, 255, 255, 0.6);
      display: grid;
      place-items: center;
      font-weight: 700;
      color: var(--accent);
    }

    .insight-refresh {
      position: absolute;
      top: 24px;
      right: 24px;
    }

    .muted {
      color: var(--muted);
      font-size: 0.8rem;
      display: block;
    }

    button {
      cursor: pointer;
      font: inherit;
    }

    .link {
      background: none;
      border: none;
      color: var(--accent);
      font-weight: 600;
      font-size: 0.8rem;
    }

    .btn-soft {
      background: var(--accent-soft);
      color: var(--accent);
      border: 1px solid #e0e7ff;
      border-radius: 999px;
      padding: 8px 24px;
      font-weight: 600;
    }

    .btn-primary {
      margin-top: 24px;
      width: 100%;
      background: var(--accent);
      color: white;
      border: none;
      border-radius: 12px;
      padding: 12px;
      font-weight: 700;
    }

    .tabs {
      display: flex;
      gap: 4px;
      padding: 4px;
      background: rgba(226, 232, 240, 0.6);
      border-radius: 12px;
      margin-bottom: 24px;
    }

    .tabs form {
      flex: 1;
    }

    .tab {
      width: 100%;
      border: none;
      background: transparent;
      border-radius: 8px;
      padding: 8px;
      font-weight: 600;
      color: var(--muted);
    }

    .tab.active {
      background: white;
      color: var(--accent);
    }

    .calendar-head {
      display: flex;
      justify-content: space-between;
      align-items: center;
      margin-bottom: 24px;
    }

    .calendar-head h3 {
      margin: 0;
    }

    .nav {
      display: flex;
      gap: 8px;
    }

    .round {
      border: none;
      background: transparent;
      border-radius: 999px;
      width: 36px;
      height: 36px;
      font-size: 1.4rem;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 8px;
    }

    .weekdays {
      margin-bottom: 8px;
      text-align: center;
      font-size: 0.7rem;
      font-weight: 600;
      color: #94a3b8;
      text-transform: uppercase;
    }

    .cell {
      min-height: 88px;
      padding: 6px;
      border: 1px solid var(--border);
      border-radius: 8px;
      display: flex;
      flex-direction: column;
      gap: 3px;
      overflow: hidden;
    }

    .cell.blank {
      border: none;
      background: rgba(248, 250, 252, 0.5);
    }

    .cell.busy {
      background: var(--accent-soft);
      border-color: #e0e7ff;
    }

    .day {
      font-size: 0.85rem;
      color: var(--muted);
    }

    .chip {
      font-size: 0.6rem;
      background: var(--accent);
      color: white;
      border-radius: 4px;
      padding: 2px 5px;
      white-space: nowrap;
      overflow: hidden;
      text-overflow: ellipsis;
    }

    .more {
      font-size: 0.6rem;
      color: var(--accent);
    }

    .history-head {
      display: flex;
      justify-content: space-between;
      align-items: flex-end;
      margin: 32px 8px 16px;
    }

    .history-head h3 {
      margin: 0;
    }

    .entry {
      background: white;
      border: 1px solid var(--border);
      border-radius: 12px;
      padding: 16px;
      margin-bottom: 12px;
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .entry-side {
      display: flex;
      align-items: center;
      gap: 16px;
      text-align: right;
    }

    .delete {
      border: none;
      background: transparent;
      color: #cbd5e1;
      font-size: 1.3rem;
    }

    .delete:hover {
      color: #ef4444;
    }

    .fields {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 16px;
      margin-bottom: 16px;
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.85rem;
      color: var(--muted);
    }

    input,
    select,
    textarea {
      font: inherit;
      padding: 8px;
      border: 1px solid var(--border);
      border-radius: 8px;
    }

    textarea {
      height: 80px;
      resize: none;
    }

    .bottom-nav {
      position: fixed;
      bottom: 16px;
      left: 50%;
      transform: translateX(-50%);
      background: rgba(255, 255, 255, 0.9);
      border: 1px solid #e0e7ff;
      border-radius: 18px;
      padding: 10px 24px;
      display: none;
      gap: 32px;
      align-items: center;
    }

    .bottom-nav button {
      border: none;
      background: transparent;
      color: var(--muted);
      font-size: 1.2rem;
    }

    .bottom-nav .add {
      width: 48px;
      height: 48px;
      border-radius: 999px;
      background: var(--accent);
      color: white;
      font-size: 1.6rem;
    }

    @media (max-width: 720px) {
      .bottom-nav {
        display: flex;
      }
    }
  </style>
</head>
<body>
  <header>
    <div class="wrap">
      <div class="top">
        <div>
          <h1>FitTrack AI</h1>
          <span class="synced">Sincronizado Localmente</span>
        </div>
        <span class="pill">{{TODAY}}</span>
      </div>
      <section class="stats">
        <div class="stat"><span class="label">Total</span><span class="value" id="count">{{COUNT}}</span></div>
        <div class="stat"><span class="label">Minutos</span><span class="value" id="minutes">{{MINUTES}}</span></div>
        <div class="stat"><span class="label">KM</span><span class="value" id="km">{{KM}}</span></div>
      </section>
    </div>
  </header>

  <main class="wrap">
    <section class="card" id="insight">
      <h2>IA Insights</h2>
      {{INSIGHT}}
    </section>

    <nav class="tabs">
      <form method="post" action="/tab/calendar"><button class="{{CALENDAR_TAB}}" type="submit">Calendário</button></form>
      <form method="post" action="/tab/form"><button class="{{FORM_TAB}}" type="submit">Nova Atividade</button></form>
    </nav>

    {{BODY}}
  </main>

  <nav class="bottom-nav">
    <form method="post" action="/tab/calendar"><button type="submit" title="Calendário">&#128197;</button></form>
    <form method="post" action="/tab/form"><button class="add" type="submit" title="Nova Atividade">+</button></form>
    <form method="post" action="/insight/refresh"><button type="submit" title="Gerar Insight IA">&#129302;</button></form>
  </nav>
</body>
</html>
"#;
