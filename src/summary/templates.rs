//! Summary templates.
//!
//! Each list item renders as `"\n- ..."` so the output carries no trailing
//! newline.

pub(super) const DAILY: &str = "\
Daily Task Summary - {{ date }}

Created Today: {{ metrics.created }}
Completed Today: {{ metrics.completed }}
Pending: {{ metrics.pending }}
In Progress: {{ metrics.in_progress }}
Overdue: {{ metrics.overdue }}

Top Focus Tasks:
{%- for task in tasks %}
- [{{ task.priority }}] {{ task.title }}{% if task.due %} (Due {{ task.due }}){% endif %}
{%- endfor %}";

pub(super) const WEEKLY: &str = "\
Weekly Task Summary (Last 7 Days)

Created: {{ metrics.created }}
Completed: {{ metrics.completed }}
Overdue: {{ metrics.overdue }}

Recently Completed:
{%- for task in tasks %}
- {{ task.title }}
{%- endfor %}";

pub(super) const MONTHLY: &str = "\
Monthly Task Summary (Last 30 Days)

Created: {{ metrics.created }}
Completed: {{ metrics.completed }}

Highlights:
{%- for task in tasks %}
- {{ task.title }}
{%- endfor %}";
