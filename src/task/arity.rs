//! `map2` through `map10`: fan a function out over several concurrent tasks.
//!
//! Each combinator is one `map` that curries the function over the first
//! task's value, followed by one `ap` per remaining task. Every curried step
//! takes exactly one argument, so the function always receives all of its
//! arguments, in order.

use std::rc::Rc;

use super::Task;

/// Builds `move |a2| move |a3| .. function(a1, a2, a3, ..)`.
macro_rules! curried {
    ($function:ident ($($bound:ident),*)) => {
        (*$function)($($bound),*)
    };
    ($function:ident ($($bound:ident),*) $next:ident : $next_type:ident $(, $rest:ident : $rest_type:ident)*) => {
        move |$next: $next_type| curried!($function ($($bound,)* $next) $($rest : $rest_type),*)
    };
}

macro_rules! define_map_n {
    ($arity:literal; $($task:ident : $binding:ident : $value:ident),+) => {
        paste::paste! {
            #[doc = concat!(
                "Forks this task and the ", stringify!($arity), " - 1 given tasks concurrently ",
                "and applies `function` to their ", stringify!($arity), " success values.\n\n",
                "The first failure among them is the failure of the result."
            )]
            pub fn [<map $arity>]<$($value,)+ R, G>(self, function: G, $($task: Task<E, $value>),+) -> Task<E, R>
            where
                G: Fn(V, $($value),+) -> R + 'static,
                $($value: 'static,)+
                R: 'static,
            {
                let function = Rc::new(function);
                self.map(move |first: V| {
                    let function = Rc::clone(&function);
                    curried!(function (first) $($binding : $value),+)
                })
                $(.ap($task))+
            }
        }
    };
}

impl<E: 'static, V: 'static> Task<E, V> {
    define_map_n!(2; t2: v2: T2);
    define_map_n!(3; t2: v2: T2, t3: v3: T3);
    define_map_n!(4; t2: v2: T2, t3: v3: T3, t4: v4: T4);
    define_map_n!(5; t2: v2: T2, t3: v3: T3, t4: v4: T4, t5: v5: T5);
    define_map_n!(6; t2: v2: T2, t3: v3: T3, t4: v4: T4, t5: v5: T5, t6: v6: T6);
    define_map_n!(7; t2: v2: T2, t3: v3: T3, t4: v4: T4, t5: v5: T5, t6: v6: T6, t7: v7: T7);
    define_map_n!(8; t2: v2: T2, t3: v3: T3, t4: v4: T4, t5: v5: T5, t6: v6: T6, t7: v7: T7, t8: v8: T8);
    define_map_n!(9; t2: v2: T2, t3: v3: T3, t4: v4: T4, t5: v5: T5, t6: v6: T6, t7: v7: T7, t8: v8: T8, t9: v9: T9);
    define_map_n!(10; t2: v2: T2, t3: v3: T3, t4: v4: T4, t5: v5: T5, t6: v6: T6, t7: v7: T7, t8: v8: T8, t9: v9: T9, t10: v10: T10);
}
