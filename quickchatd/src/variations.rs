//! Built-in message catalog and the default D-pad combo table.
//!
//! Templates can be plain text or include `{category}` placeholders; see
//! [`crate::template`] for the syntax. Messages stay under ~100 characters
//! to fit the in-game chat limit.

use quickchat_common::{Direction, Gesture};
use std::collections::HashMap;

use Direction::{Down, Left, Right, Up};

/// The default variation table: category name -> candidate messages
pub fn builtin_variations() -> HashMap<String, Vec<String>> {
    let mut table: HashMap<String, Vec<String>> = HashMap::new();

    let mut insert = |key: &str, items: &[&str]| {
        table.insert(key.to_string(), items.iter().map(|s| s.to_string()).collect());
    };

    // Calling the ball, with varying confidence levels
    insert("I Got It", &[
        "I got it... maybe.",
        "I got it... probably.",
        "I got it... definitely. (Don't quote me.)",
        "I got it! (Narrator: He did not.)",
        "I got it! Trust the process!",
        "I got it... assuming my boost cooperates.",
        "I got it! Clear the area, genius at work!",
        "Mine! Or not. We'll see.",
        "I got this. I've been training for this moment. (I haven't.)",
        "Going for it! Pray for me.",
        "I got it! (Said with the confidence of someone who doesn't.)",
        "On it like a bonnet!",
        "I'm going! Cover my emotional baggage!",
        "Taking it! Results may vary.",
        "My ball! My rules! My whiff!",
        "I got it... on alternate Tuesdays.",
        "Going! If I miss, we never speak of this.",
    ]);

    insert("Defending", &[
        "Defending... emotionally and physically.",
        "I'm back! Guarding the net like my life depends on it. (It does.)",
        "Defending! Nothing gets past me. Except most shots.",
        "Back on D! D stands for 'definitely panicking.'",
        "Goalie mode: ACTIVATED. Confidence: QUESTIONABLE.",
        "Defending! I am the wall. A very porous wall.",
        "I'm last back! Everyone stay calm! STAY CALM!",
        "Guarding goal. Send positive vibes.",
        "Defending with the fury of a thousand bronze players!",
        "I'm back! The net is safe-ish.",
        "On defense! (Mentally preparing for the replay.)",
        "Defending! I watched a tutorial once.",
        "I'm the goalie now. Pray.",
        "Back in net! Accepting tips and therapy recommendations.",
        "Defending! Bold of them to shoot while I'm awake.",
    ]);

    insert("Greeting", &[
        "OH SNAP! Hello there, fellow car enthusiast!",
        "Greetings, traveler! Welcome to the thunderdome!",
        "Hello! I come in peace. My shots? Not so much.",
        "Ahoy, boost pirates!",
        "What's up, fellow ball chasers!",
        "Hey hey! Let's make some bad decisions together!",
        "Salutations! May your demos be swift and your whiffs be hidden!",
        "Hello friends! And future friends who don't know it yet!",
        "Yo! Ready to question our life choices?",
        "Greetings from someone who peaked in Season 3!",
        "Hey! I brought snacks. (The snacks are goals.)",
        "Hello! I'm here to kick ball and chew boost. And I'm all out of boost.",
        "Sup! Let's get this bread. The bread is the ball. Don't ask.",
        "Hey there! Nice cars! This is gonna hurt!",
        "Hola! Prepare for calculated chaos!",
    ]);

    insert("Nice One", &[
        "Nice shot! Was that intentional? Either way, WOW!",
        "Nice one! That was cleaner than my room!",
        "Great pass! Telepathy confirmed!",
        "What a play! That was beautiful and I'm emotional now.",
        "Nice shot! That was illegal in at least 12 states.",
        "Beautiful! Chef's kiss! Five stars!",
        "Nice one! Clip it! Send it! Frame it!",
        "Great shot! I believed in you the whole time. (I didn't.)",
        "Nice pass! We're basically telepathic now.",
        "Wow! That was smoother than butter on a hot pan!",
        "Nice one! Your car has AURA.",
        "What a shot! The physics engine is SHOOK.",
        "Great play! I'd clap but I'm holding a controller.",
        "Nice! That was more calculated than my taxes!",
        "What a save! Flexed on them, you did.",
        "Nice shot! That was straight out of RLCS!",
        "Beautiful pass! We're in sync like a boyband!",
        "Nice one! Someone call Psyonix, that was art!",
        "Great shot! I'm not crying, you're crying!",
        "What a play! I need a moment.",
    ]);

    insert("Centering", &[
        "Centering! (Narrator: He was not centering.)",
        "Centering! Ball incoming! Probably!",
        "Setting you up! Don't leave me hanging!",
        "Passing! Do the thing! Score the goal!",
        "Centering! I'm like a waiter serving goals!",
        "Cross incoming! (Results not guaranteed.)",
        "Centering! I believe in you even if the ball doesn't!",
        "Passing! The rest is your problem!",
        "Setting up shop! Come get your free goals!",
        "Centering! This is a team effort! I did my part!",
        "Cross! Inbound! Hopefully!",
        "Passing mid! I'm basically an assist machine!",
        "Centering! It's not a whiff if you meant to pass!",
        "Setting you up for glory! (Or pain. 50/50.)",
        "Incoming pass! I BELIEVE!",
    ]);

    insert("Thanks", &[
        "Thanks! That was definitely intentional! (It wasn't.)",
        "Thank you, kind teammate! You're a real one!",
        "Thanks! We're basically a championship duo now!",
        "Appreciate it! My therapist was right about teamwork!",
        "Thanks! I owe you a boost pad!",
        "Thank you! That was smoother than my aerial attempts!",
        "Thanks! You're my favorite random!",
        "Appreciate the setup! I almost felt useful!",
        "Thanks! We're vibing on another level!",
        "Thank you! This is the teamwork I dreamed of!",
        "Thanks! You're carrying and I appreciate it!",
        "Gracias! Merci! Danke! All the thanks!",
        "Thanks! I'll name my next aerial after you!",
        "Appreciate it! We're in sync like a playlist!",
        "Thanks! You're the assist to my... attempt!",
    ]);

    insert("Celebration", &[
        "Great job, team! Nobody look at the replay!",
        "We're on fire! (Stop drop and rotate!)",
        "Calculated! (I own a calculator!)",
        "WINNING! (Narrator: He was not... wait, he was!)",
        "Peak Rocket League! Clip it! Send it to NASA!",
        "LET'S GOOO! That's what I'm talking about!",
        "WE DID IT! Group hug! Virtual group hug!",
        "BEAUTIFUL! I'm getting emotional!",
        "That's how it's done! Someone screenshot this!",
        "WE'RE GAMING NOW! This is the good stuff!",
        "GOLAZO! (I've been waiting to use that.)",
        "WHAT A GOAL! I was definitely helpful somehow!",
        "YES! This is our championship moment!",
        "INCREDIBLE! We're basically pros now!",
        "POGGERS! (Do people still say that?)",
    ]);

    insert("Apology", &[
        "My bad, that was on me.",
        "Sorry about that. Brain buffering.",
        "Whoops. That was my controller. (It wasn't.)",
        "Apologies. I got jumpscared by the ball.",
        "Sorry! I saw a boost pad and blacked out.",
        "My bad! The vibes were off on that one.",
        "Sorry! Gravity works differently for me apparently.",
        "Oops! That was... that was something.",
        "My bad! I panicked and chose violence. Against myself.",
        "Sorry! I'm still learning. (After 2000 hours.)",
        "Apologies! The ball is faster than my brain.",
        "My bad! I'll hit the next one. (No guarantees.)",
        "Sorry! I trusted the physics and the physics lied.",
        "Oops! Let's never speak of this again.",
        "My bad! I blame the server. (It was me.)",
    ]);

    insert("Need Boost", &[
        "Need boost! I'm running on hopes and fumes!",
        "No boost! I'm basically a very slow brick right now!",
        "Need boost! My tank is drier than my humor!",
        "Zero boost! I'm coasting on prayers!",
        "Boost please! My car is sad and empty!",
        "Running on empty! Send help! Send boost!",
        "No boost! I'm just vibes and bad decisions!",
        "Need boost! Currently operating on pure spite!",
        "Boost-less! I'm a sitting duck! A car duck!",
        "Empty tank! I'm decorative right now!",
        "No boost! My car is questioning its life choices!",
        "Need boost! I'm held together by hope and momentum!",
        "Zero fuel! I'm running on audacity alone!",
        "Boost starved! Someone adopt me!",
        "No boost! I'm basically a paper weight!",
    ]);

    insert("No Problem", &[
        "No problem! (It was absolutely your fault.)",
        "All good! We'll get 'em next time! (We won't.)",
        "No worries! I've made worse decisions! (Have I?)",
        "It's fine! Everything is fine! THIS IS FINE!",
        "No problem! Pain is temporary, vibes are eternal!",
        "All good! We're still learning! (Allegedly.)",
        "No worries! That's just extra spicy gameplay!",
        "It's okay! Mistakes build character!",
        "No problem! I didn't see anything! (I saw everything.)",
        "All good! The important thing is friendship!",
        "No worries! We'll pretend that didn't happen!",
        "It's fine! I've seen worse! (I haven't.)",
        "No problem! Growth mindset! Learning experience!",
        "All good! At least we're having fun! (Are we?)",
        "No worries! I still believe in us! (Barely.)",
    ]);

    insert("Challenge", &[
        "I dare you to score. Do it. I double-dog dare you.",
        "Try to beat that!",
        "Challenge accepted! (I regret everything.)",
        "Meet me in the midfield. We'll settle this with vibes.",
        "1v1 me behind the boost pad.",
        "Bold of you to challenge me while I'm holding drift.",
        "You dare challenge ME? In MY ranked lobby?",
        "Is that a challenge? Because I'm already nervous!",
        "Fight me in the air! (I'll probably miss but STILL!)",
        "Challenge mode activated! (Panic mode also activated!)",
        "You want some of this? THIS IS ROCKET LEAGUE!",
        "Square up! My aerials are ready! (They're not.)",
        "Challenge accepted! May the best whiffer win!",
        "You vs me! Let's see what happens!",
        "I challenge you to a duel! (Of bad decisions!)",
    ]);

    insert("Confidence Boost", &[
        "We are absolutely winning this! (Source: me.)",
        "We're the main characters. Act like it!",
        "Trust the process! (I have no idea what the process is.)",
        "We're so back.",
        "If confidence was boost, we'd be supersonic!",
        "Calculated! (Not really, but BELIEVE!)",
        "We're about to peak. Probably. Maybe.",
        "Winner's mentality: ENGAGED. Mechanics: Optional.",
        "I can feel the montage music starting!",
        "This lobby isn't ready for our nonsense!",
        "We've got this! Statistically, we have to win eventually!",
        "Champions in the making! Future legends right here!",
        "We're different! We're special! We're slightly above average!",
        "Believe in the me that believes in you!",
        "We're gonna be unstoppable! (One day!)",
    ]);

    insert("Encouraging Taunt", &[
        "Is that all you've got? (I'm genuinely asking.)",
        "Nice try! That was almost a thing!",
        "You're getting warmer! Like, room temperature.",
        "Not bad! Now do it on purpose!",
        "You're almost there! (Where is 'there'? Nobody knows.)",
        "Getting better with every try! Statistically.",
        "You're on the right track! Now let's find the ball!",
        "Impressive... but I'm still emotionally unprepared.",
        "Keep trying! You're almost unstoppable! Almost.",
        "You're a force to be reckoned with! In a different lobby.",
        "You can do better than that! I believe in future-you!",
        "That was a shot! Technically speaking.",
        "So close! In a metaphysical sense!",
        "Nice attempt! Have you tried practicing? (Same.)",
        "Good effort! The ball respects your hustle!",
    ]);

    // Quick one-liners, shared by two combos
    insert("compliment", &[
        "Great!",
        "Awesome!",
        "Amazing!",
        "Fantastic!",
        "Impressive!",
        "Excellent!",
        "Outstanding!",
        "Stellar!",
        "Splendid!",
        "Magnificent!",
        "Brilliant!",
        "Glorious!",
        "Legendary!",
        "Epic!",
        "Phenomenal!",
        "Incredible!",
        "Spectacular!",
        "Marvelous!",
        "Perfection!",
        "Chef's kiss!",
        "More legendary than a unicorn in a top hat!",
        "Cooler than a polar bear's toenails!",
        "Shinier than a freshly waxed penguin!",
        "As epic as a double rainbow!",
        "Worthy of a mic drop!",
        "As dazzling as fireworks!",
        "That was illegal in at least 12 states!",
        "Your car has aura!",
    ]);

    insert("cat fact", &[
        "CAT FAX: Cats have 32 muscles in each ear. They still won't hear 'rotate.'",
        "CAT FAX: A group of cats is a clowder. A group of teammates is a 'double commit.'",
        "CAT FAX: Cats sleep 12-16 hours/day. Same as me after whiffing.",
        "CAT FAX: Cats purr at ~25 Hz. My car purrs at 0 boost.",
        "CAT FAX: Cats can't taste sweetness. I can't taste victory either. (Yet.)",
        "CAT FAX: Cats have whiskers for spatial awareness. I have vibes.",
        "CAT FAX: The slow blink means trust. The fast flip means panic.",
        "CAT FAX: Cats always land on their feet. I land on the ceiling.",
        "CAT FAX: Cats knead to relax. I powerslide into the post to relax.",
        "CAT FAX: Cats can jump ~6x their height. I can jump 0x my rank.",
        "CAT FAX: A cat's nose print is unique. So is my ability to miss open nets.",
        "CAT FAX: Cats have retractable claws. I have retractable confidence.",
        "CAT FAX: Cats have a third eyelid. I have a third whiff.",
        "CAT FAX: Cats groom to remove scent. I demo to remove problems.",
        "CAT FAX: Cats are crepuscular (dawn/dusk). I'm carpuscular (all the time).",
        "CAT FAX: Cats can squeeze through tiny gaps. I can't squeeze through midfield.",
        "CAT FAX: Cats communicate with tails. I communicate with rapid backflips.",
        "CAT FAX: Cats dislike water. I dislike overtime.",
        "CAT FAX: Cats have great night vision. I still can't see the ball.",
        "CAT FAX: Cats have 18 toes. I have 0 mechanics.",
        "CAT FAX: Cats can rotate ears 180 degrees. I can rotate my car 720 and still miss.",
        "CAT FAX: Cats were worshipped in ancient Egypt. I worship the small boost pad.",
        "CAT FAX: Cats have a collarbone that helps them fit places. I have a hitbox and regret.",
        "CAT FAX: Cats can run ~30 mph. I can drive 100 and still be late to the play.",
        "CAT FAX: Cats have an organ to 'taste' smells. I have an organ to taste Ls.",
        "CAT FAX: Cats meow mostly at humans. I spam chat mostly at myself.",
        "CAT FAX: Cats make biscuits. I make own-goals.",
        "CAT FAX: Cats shed. I also shed rank points.",
        "CAT FAX: Cats love boxes. I love being boxed in the corner.",
        "CAT FAX: Cats chase lasers. I chase the ball like it's a laser pointer.",
        "CAT FAX: Cats have great balance. I have great excuses.",
        "CAT FAX: Cats nap to conserve energy. I conserve boost by never having any.",
        "CAT FAX: Cats can learn routines. I can learn kickoff. (Someday.)",
        "CAT FAX: Cats have excellent reflexes. I have excellent lag.",
        "CAT FAX: Cats knead with paws. I knead with D-pad inputs.",
    ]);

    table
}

/// The default combo table: D-pad gesture -> message template
pub fn builtin_macros() -> HashMap<Gesture, String> {
    let combos: [(Direction, Direction, &str); 16] = [
        // Callouts
        (Up, Up, "{I Got It}"),
        (Up, Down, "{Defending}"),
        (Up, Left, "{Need Boost}"),
        (Right, Up, "{Centering}"),
        // Positive reactions
        (Left, Up, "{Nice One}"),
        (Left, Right, "{Thanks}"),
        (Left, Down, "{Celebration}"),
        (Left, Left, "{compliment}"),
        (Right, Left, "{compliment}"),
        // Morale
        (Up, Right, "{Confidence Boost}"),
        (Down, Up, "{Greeting}"),
        // Responses
        (Down, Right, "{No Problem}"),
        (Down, Left, "{Apology}"),
        // Taunts and challenges
        (Right, Right, "{Encouraging Taunt}"),
        (Right, Down, "{Challenge}"),
        // The best feature
        (Down, Down, "{cat fact}"),
    ];

    combos
        .iter()
        .map(|(first, second, template)| (Gesture::new(*first, *second), template.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_combo_references_a_known_category() {
        let variations = builtin_variations();
        let mut picker = crate::picker::VariationPicker::from_seed(variations, 1);

        for (gesture, template) in builtin_macros() {
            let rendered = crate::template::render_template(&template, |key| picker.pick(key));
            assert!(rendered.is_ok(), "combo {} failed: {:?}", gesture, rendered);
            assert!(!rendered.unwrap().trim().is_empty());
        }
    }

    #[test]
    fn test_all_sixteen_combos_are_mapped() {
        assert_eq!(builtin_macros().len(), 16);
    }

    #[test]
    fn test_messages_fit_chat_limit() {
        for (category, items) in builtin_variations() {
            assert!(!items.is_empty(), "category {} is empty", category);
            for item in items {
                assert!(item.len() <= 100, "too long in {}: {}", category, item);
            }
        }
    }
}
