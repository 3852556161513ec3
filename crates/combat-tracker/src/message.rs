//! Death message rendering.
//!
//! Every [`DeathCause`] has a plain phrasing, and most have a variant naming
//! the entity credited for the death. Templates use the `{victim}`,
//! `{attacker}` and `{item}` placeholders.

use combat_types::{DamageOption, DeathCause};

/// Name substituted when a template needs an attacker nobody can be
/// credited as.
const UNKNOWN_ATTACKER: &str = "something";

/// Phrasings of one death cause.
struct Phrasing {
    plain: &'static str,
    fighting: Option<&'static str>,
    with_item: Option<&'static str>,
}

const fn phrasing(cause: DeathCause) -> Phrasing {
    const fn p(
        plain: &'static str,
        fighting: Option<&'static str>,
        with_item: Option<&'static str>,
    ) -> Phrasing {
        Phrasing {
            plain,
            fighting,
            with_item,
        }
    }

    match cause {
        DeathCause::Generic | DeathCause::Custom => {
            p("{victim} died", Some("{victim} died because of {attacker}"), None)
        }
        DeathCause::Fell => p(
            "{victim} hit the ground too hard",
            Some("{victim} hit the ground too hard whilst trying to escape {attacker}"),
            None,
        ),
        DeathCause::FellFromHigh => p(
            "{victim} fell from a high place",
            Some("{victim} was doomed to fall by {attacker}"),
            None,
        ),
        DeathCause::InFire => p(
            "{victim} went up in flames",
            Some("{victim} walked into fire whilst fighting {attacker}"),
            None,
        ),
        DeathCause::OnFire => p(
            "{victim} burned to death",
            Some("{victim} was burned to a crisp whilst fighting {attacker}"),
            None,
        ),
        DeathCause::Lava => p(
            "{victim} tried to swim in lava",
            Some("{victim} tried to swim in lava to escape {attacker}"),
            None,
        ),
        DeathCause::HotFloor => p(
            "{victim} discovered the floor was lava",
            Some("{victim} walked into the danger zone due to {attacker}"),
            None,
        ),
        DeathCause::Drowned => p(
            "{victim} drowned",
            Some("{victim} drowned whilst trying to escape {attacker}"),
            None,
        ),
        DeathCause::InWall => p(
            "{victim} suffocated in a wall",
            Some("{victim} suffocated in a wall whilst fighting {attacker}"),
            None,
        ),
        DeathCause::Cramming => p(
            "{victim} was squished too much",
            Some("{victim} was squashed by {attacker}"),
            None,
        ),
        DeathCause::Explosion => p(
            "{victim} blew up",
            Some("{victim} was blown up by {attacker}"),
            Some("{victim} was blown up by {attacker} using {item}"),
        ),
        DeathCause::OutOfWorld => p(
            "{victim} fell out of the world",
            Some("{victim} didn't want to live in the same world as {attacker}"),
            None,
        ),
        DeathCause::LightningBolt => p(
            "{victim} was struck by lightning",
            Some("{victim} was struck by lightning whilst fighting {attacker}"),
            None,
        ),
        DeathCause::Starve => p(
            "{victim} starved to death",
            Some("{victim} starved to death whilst fighting {attacker}"),
            None,
        ),
        DeathCause::Magic => p(
            "{victim} was killed by magic",
            Some("{victim} was killed by magic whilst trying to escape {attacker}"),
            None,
        ),
        DeathCause::Wither => p(
            "{victim} withered away",
            Some("{victim} withered away whilst fighting {attacker}"),
            None,
        ),
        DeathCause::Cactus => p(
            "{victim} was pricked to death",
            Some("{victim} walked into a cactus whilst trying to escape {attacker}"),
            None,
        ),
        DeathCause::Thorns => p(
            "{victim} was killed trying to hurt {attacker}",
            None,
            Some("{victim} was killed by {item} trying to hurt {attacker}"),
        ),
        DeathCause::FallingBlock => p(
            "{victim} was squashed by a falling block",
            Some("{victim} was squashed by a falling block whilst fighting {attacker}"),
            None,
        ),
        DeathCause::DragonBreath => p(
            "{victim} was roasted in dragon breath",
            Some("{victim} was roasted in dragon breath by {attacker}"),
            None,
        ),
        DeathCause::FlyIntoWall => p(
            "{victim} experienced kinetic energy",
            Some("{victim} experienced kinetic energy whilst trying to escape {attacker}"),
            None,
        ),
        DeathCause::Freeze => p(
            "{victim} froze to death",
            Some("{victim} was frozen to death by {attacker}"),
            None,
        ),
        DeathCause::SonicBoom => p(
            "{victim} was obliterated by a sonically-charged shriek",
            Some("{victim} was obliterated by a sonically-charged shriek whilst trying to escape {attacker}"),
            None,
        ),
        DeathCause::Slain => p(
            "{victim} was slain by {attacker}",
            None,
            Some("{victim} was slain by {attacker} using {item}"),
        ),
        DeathCause::Shot => p(
            "{victim} was shot by {attacker}",
            None,
            Some("{victim} was shot by {attacker} using {item}"),
        ),
        DeathCause::OutsideBorder => p(
            "{victim} left the confines of this world",
            Some("{victim} left the confines of this world whilst fighting {attacker}"),
            None,
        ),
        DeathCause::Killed => p("{victim} was killed", None, None),
    }
}

/// Render the death message for `cause` phrased as `option`.
///
/// Falls back to the plain phrasing when the requested variant does not
/// exist for `cause` or lacks the attacker or item it needs.
pub fn render(
    cause: DeathCause,
    option: DamageOption,
    victim: &str,
    attacker: Option<&str>,
    item: Option<&str>,
) -> String {
    let phrasing = phrasing(cause);
    let template = match (option, attacker, item) {
        (DamageOption::WithItem, Some(_), Some(_)) => phrasing.with_item,
        (DamageOption::WhilstFighting, Some(_), _) => phrasing.fighting,
        _ => None,
    }
    .unwrap_or(phrasing.plain);

    fill(template, |token| match token {
        "victim" => Some(victim),
        "attacker" => Some(attacker.unwrap_or(UNKNOWN_ATTACKER)),
        "item" => Some(item.unwrap_or_default()),
        _ => None,
    })
}

/// Substitute each `{token}` in `template` in one left-to-right pass.
///
/// Only the template is scanned, so substituted names are copied verbatim
/// even when they contain braces. Unknown tokens and unmatched braces are
/// left as written.
fn fill<'a>(template: &str, value: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len().saturating_mul(2));
    let mut rest = template;
    while let Some((before, after)) = rest.split_once('{') {
        out.push_str(before);
        let Some((token, tail)) = after.split_once('}') else {
            out.push('{');
            rest = after;
            break;
        };
        if let Some(replacement) = value(token) {
            out.push_str(replacement);
        } else {
            out.push('{');
            out.push_str(token);
            out.push('}');
        }
        rest = tail;
    }
    out.push_str(rest);
    out
}
